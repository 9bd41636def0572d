// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Where an asset comes from.

use std::fmt;
use std::path::PathBuf;

use dolly_scene_port::BlobKind;

/// Source of a load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Absolute URL or a path relative to the fetcher's base URL.
    Remote(String),
    /// File on the local filesystem.
    Local(PathBuf),
}

impl AssetSource {
    /// Blob slot this source fills once displayed.
    pub fn kind(&self) -> BlobKind {
        match self {
            Self::Remote(_) => BlobKind::Remote,
            Self::Local(_) => BlobKind::Local,
        }
    }

    /// Short label for logs and blob handles: the last path segment.
    pub fn label(&self) -> String {
        let full = match self {
            Self::Remote(url) => url.split(['?', '#']).next().unwrap_or(url).to_owned(),
            Self::Local(path) => path.to_string_lossy().into_owned(),
        };
        full.rsplit(['/', '\\'])
            .find(|s| !s.is_empty())
            .unwrap_or(full.as_str())
            .to_owned()
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "file:{}", path.display()),
        }
    }
}
