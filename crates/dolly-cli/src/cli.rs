// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument definitions and how they combine with stored preferences.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dolly_app_core::prefs::{LoaderPrefs, ReadModePref, ShotPrefs};
use dolly_loader::{AssetSource, ReadMode};
use dolly_shot::{AngleClass, DistanceClass, ShotParameters, ShotStyle};
use reqwest::Url;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dolly shot previewer")]
pub(crate) struct Args {
    /// Directory holding preferences (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
    /// Persist the effective settings after the command runs
    #[arg(long, global = true)]
    pub save_prefs: bool,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print camera poses over a time range
    Pose(PoseArgs),
    /// Load a model headlessly and run preview frames
    Load(LoadArgs),
    /// List the models in a manifest
    Manifest(ManifestArgs),
    /// Build a deep link for a model path, or decode one
    Link(LinkArgs),
}

/// Shot overrides; unset flags fall back to stored preferences.
#[derive(ClapArgs, Debug, Default)]
pub(crate) struct ShotArgs {
    /// Motion style (static, orbit, dolly, truck, crane)
    #[arg(long)]
    pub style: Option<ShotStyle>,
    /// Distance class (close, medium, wide)
    #[arg(long)]
    pub distance: Option<DistanceClass>,
    /// Angle class (bird, high, level, low)
    #[arg(long)]
    pub angle: Option<AngleClass>,
    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,
    /// Speed multiplier
    #[arg(long)]
    pub speed: Option<f32>,
}

impl ShotArgs {
    /// Fold the overrides into `prefs` and return the resulting parameters.
    pub fn apply(&self, prefs: &mut ShotPrefs) -> ShotParameters {
        if let Some(style) = self.style {
            prefs.style = style.name().to_owned();
        }
        if let Some(distance) = self.distance {
            prefs.distance = distance.name().to_owned();
        }
        if let Some(angle) = self.angle {
            prefs.angle = angle.name().to_owned();
        }
        if let Some(fov) = self.fov {
            prefs.fov_deg = fov;
        }
        if let Some(speed) = self.speed {
            prefs.speed = speed;
        }
        shot_from_prefs(prefs)
    }
}

/// Stored shot names are parsed leniently; a bad entry falls back to its default.
pub(crate) fn shot_from_prefs(prefs: &ShotPrefs) -> ShotParameters {
    ShotParameters::new(
        ShotStyle::from_name_lenient(&prefs.style),
        prefs.distance.parse().unwrap_or_default(),
        prefs.angle.parse().unwrap_or_default(),
        prefs.fov_deg,
        prefs.speed,
    )
}

#[derive(ClapArgs, Debug)]
pub(crate) struct PoseArgs {
    #[command(flatten)]
    pub shot: ShotArgs,
    /// First sample time in seconds
    #[arg(long, default_value_t = 0.0)]
    pub from: f32,
    /// Last sample time in seconds
    #[arg(long, default_value_t = 10.0)]
    pub to: f32,
    /// Seconds between samples
    #[arg(long, default_value_t = 1.0)]
    pub step: f32,
    /// Subject center as `x,y,z`
    #[arg(long, value_parser = parse_vec3)]
    pub center: Option<glam::Vec3>,
    /// Subject radius
    #[arg(long)]
    pub radius: Option<f32>,
    /// Subject height
    #[arg(long)]
    pub height: Option<f32>,
}

impl PoseArgs {
    /// Sample times from `from` to `to` inclusive. Empty for a non-positive step or reversed range.
    pub fn samples(&self) -> Vec<f32> {
        if !self.step.is_finite() || self.step <= 0.0 || self.to < self.from {
            return Vec::new();
        }
        let count = ((self.to - self.from) / self.step).floor() as usize;
        (0..=count).map(|i| self.from + self.step * i as f32).collect()
    }
}

fn parse_vec3(raw: &str) -> Result<glam::Vec3, String> {
    let parts: Vec<f32> = raw
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(glam::Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got `{raw}`")),
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ModeArg {
    /// Report progress per chunk
    Chunked,
    /// Read the whole body at once
    Bulk,
}

/// Loader overrides shared by `load` and `manifest`.
#[derive(ClapArgs, Debug, Default)]
pub(crate) struct LoaderArgs {
    /// Base URL that relative remote paths resolve against
    #[arg(long)]
    pub base_url: Option<String>,
    /// How remote bodies are read
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Seconds to wait for the render target before forcing ready
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl LoaderArgs {
    /// Fold the overrides into `prefs`.
    pub fn apply(&self, prefs: &mut LoaderPrefs) {
        if let Some(base) = &self.base_url {
            prefs.base_url = Some(base.clone());
        }
        if let Some(mode) = self.mode {
            prefs.read_mode = match mode {
                ModeArg::Chunked => ReadModePref::Chunked,
                ModeArg::Bulk => ReadModePref::Bulk,
            };
        }
        if let Some(secs) = self.timeout {
            prefs.timeout_secs = secs;
        }
    }
}

pub(crate) fn read_mode(pref: ReadModePref) -> ReadMode {
    match pref {
        ReadModePref::Chunked => ReadMode::Chunked,
        ReadModePref::Bulk => ReadMode::Bulk,
    }
}

pub(crate) fn timeout(prefs: &LoaderPrefs) -> Duration {
    Duration::from_secs(prefs.timeout_secs.max(1))
}

#[derive(ClapArgs, Debug)]
pub(crate) struct LoadArgs {
    /// URL, path relative to the base URL, or local file. Defaults to the last remote model.
    pub source: Option<String>,
    #[command(flatten)]
    pub loader: LoaderArgs,
    #[command(flatten)]
    pub shot: ShotArgs,
    /// Preview frames to run after the model is ready
    #[arg(long, default_value_t = 60)]
    pub frames: u32,
    /// Frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,
    /// Start with the clock paused
    #[arg(long)]
    pub paused: bool,
}

#[derive(ClapArgs, Debug)]
pub(crate) struct ManifestArgs {
    /// Manifest URL or file (defaults to the stored manifest, then `manifest.json`)
    pub location: Option<String>,
    #[command(flatten)]
    pub loader: LoaderArgs,
}

#[derive(ClapArgs, Debug)]
pub(crate) struct LinkArgs {
    /// Model path to link, or a link to decode with `--decode`
    pub value: String,
    /// Decode a deep link instead of building one
    #[arg(long)]
    pub decode: bool,
    /// Page the link points at
    #[arg(long, default_value = "http://localhost:8080/")]
    pub page: String,
}

/// Absolute URLs and missing paths are remote; an existing path is local.
pub(crate) fn parse_source(raw: &str) -> AssetSource {
    if Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https")) {
        return AssetSource::Remote(raw.to_owned());
    }
    let path = Path::new(raw);
    if path.exists() {
        AssetSource::Local(path.to_path_buf())
    } else {
        AssetSource::Remote(raw.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn shot_flags_override_prefs() {
        let args = Args::try_parse_from([
            "dolly", "pose", "--style", "dolly", "--angle", "high", "--fov", "99",
        ])
        .unwrap();
        let Command::Pose(pose) = args.cmd else {
            panic!("expected pose");
        };
        let mut prefs = ShotPrefs::default();
        let params = pose.shot.apply(&mut prefs);
        assert_eq!(params.style(), ShotStyle::Dolly);
        assert_eq!(params.angle(), AngleClass::High);
        assert_eq!(params.distance(), DistanceClass::Medium);
        assert_eq!(params.fov_deg(), 85.0);
        assert_eq!(prefs.style, "DOLLY");
        assert_eq!(prefs.fov_deg, 99.0);
    }

    #[test]
    fn unknown_style_flag_is_rejected() {
        assert!(Args::try_parse_from(["dolly", "pose", "--style", "zoom"]).is_err());
    }

    #[test]
    fn corrupt_prefs_fall_back() {
        let prefs = ShotPrefs {
            style: "ZOOM".into(),
            distance: "far".into(),
            ..ShotPrefs::default()
        };
        let params = shot_from_prefs(&prefs);
        assert_eq!(params.style(), ShotStyle::Static);
        assert_eq!(params.distance(), DistanceClass::Medium);
    }

    #[test]
    fn sample_range_is_inclusive() {
        let args = Args::try_parse_from([
            "dolly", "pose", "--from", "1", "--to", "2", "--step", "0.5", "--center", "1,2,3",
        ])
        .unwrap();
        let Command::Pose(pose) = args.cmd else {
            panic!("expected pose");
        };
        assert_eq!(pose.samples(), vec![1.0, 1.5, 2.0]);
        assert_eq!(pose.center, Some(glam::Vec3::new(1.0, 2.0, 3.0)));

        let zero = PoseArgs {
            step: 0.0,
            ..pose
        };
        assert!(zero.samples().is_empty());
    }

    #[test]
    fn loader_flags_override_prefs() {
        let args = Args::try_parse_from([
            "dolly",
            "load",
            "models/a.glb",
            "--mode",
            "bulk",
            "--timeout",
            "5",
            "--save-prefs",
        ])
        .unwrap();
        assert!(args.save_prefs);
        let Command::Load(load) = args.cmd else {
            panic!("expected load");
        };
        let mut prefs = LoaderPrefs::default();
        load.loader.apply(&mut prefs);
        assert_eq!(read_mode(prefs.read_mode), ReadMode::Bulk);
        assert_eq!(timeout(&prefs), Duration::from_secs(5));
        assert_eq!(load.source.as_deref(), Some("models/a.glb"));
    }

    #[test]
    fn sources_are_classified() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.glb");
        std::fs::write(&file, b"x").unwrap();
        assert_eq!(
            parse_source(file.to_str().unwrap()),
            AssetSource::Local(file.clone())
        );
        assert_eq!(
            parse_source("https://cdn.test/a.glb"),
            AssetSource::Remote("https://cdn.test/a.glb".into())
        );
        assert_eq!(
            parse_source("models/missing.glb"),
            AssetSource::Remote("models/missing.glb".into())
        );
    }
}
