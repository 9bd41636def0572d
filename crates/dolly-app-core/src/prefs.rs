// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved preferences for the previewer (shot defaults + loader settings).

use serde::{Deserialize, Serialize};

/// Config key under which [`PreviewPrefs`] are stored.
pub const PREFS_KEY: &str = "preview_prefs";

/// Everything the previewer remembers between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PreviewPrefs {
    /// Last shot selection.
    pub shot: ShotPrefs,
    /// Loader settings.
    pub loader: LoaderPrefs,
}

/// Shot selection as stored on disk.
///
/// Names are kept as strings so an unknown value from a newer build still
/// loads; the shot crate maps unknown styles to STATIC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotPrefs {
    /// Motion style name.
    pub style: String,
    /// Distance class name.
    pub distance: String,
    /// Angle class name.
    pub angle: String,
    /// Field of view (degrees).
    pub fov_deg: f32,
    /// Speed multiplier.
    pub speed: f32,
    /// Whether the clock starts playing.
    pub playing: bool,
}

impl Default for ShotPrefs {
    fn default() -> Self {
        Self {
            style: "ORBIT".into(),
            distance: "MEDIUM".into(),
            angle: "LEVEL".into(),
            fov_deg: 50.0,
            speed: 0.8,
            playing: true,
        }
    }
}

/// How remote bodies are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadModePref {
    /// Stream chunk by chunk with progress per chunk.
    #[default]
    Chunked,
    /// Read the whole body at once.
    Bulk,
}

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderPrefs {
    /// Forced-completion ceiling in seconds.
    pub timeout_secs: u64,
    /// Remote read mode.
    pub read_mode: ReadModePref,
    /// Base URL that relative remote paths resolve against.
    pub base_url: Option<String>,
    /// Manifest file path or URL.
    pub manifest: Option<String>,
    /// Last remote path that loaded successfully.
    pub last_remote: Option<String>,
}

impl Default for LoaderPrefs {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            read_mode: ReadModePref::Chunked,
            base_url: None,
            manifest: None,
            last_remote: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_blob_fills_defaults() {
        let prefs: PreviewPrefs =
            serde_json::from_str(r#"{"shot":{"style":"DOLLY"},"loader":{"read_mode":"bulk"}}"#)
                .unwrap();
        assert_eq!(prefs.shot.style, "DOLLY");
        assert_eq!(prefs.shot.distance, "MEDIUM");
        assert_eq!(prefs.loader.read_mode, ReadModePref::Bulk);
        assert_eq!(prefs.loader.timeout_secs, 30);
    }
}
