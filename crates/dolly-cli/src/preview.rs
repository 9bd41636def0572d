// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless `load` and `manifest` commands.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use dolly_app_core::prefs::PreviewPrefs;
use dolly_app_core::progress::{OverlayState, Percent, ProgressOverlay, ProgressSink};
use dolly_loader::{
    load_manifest, AssetFetcher, AssetSource, LoadCoordinator, LoadOutcome, LoaderConfig,
};
use dolly_scene_gltf::GltfTarget;
use dolly_scene_port::{CameraState, RenderTarget};
use dolly_shot::{solve_pose, FocusTracker, FrameTicker, ShotClock};
use reqwest::Url;
use tracing::{info, warn};

use crate::cli::{self, LoadArgs, ManifestArgs};

const DEFAULT_MANIFEST: &str = "manifest.json";

/// Overlay that echoes each visible change to stderr.
#[derive(Debug, Default)]
pub(crate) struct ConsoleSink {
    overlay: ProgressOverlay,
}

impl ConsoleSink {
    fn echo(&self, before: u64) {
        if self.overlay.revision() == before {
            return;
        }
        match self.overlay.state() {
            OverlayState::Hidden => {}
            OverlayState::Progress { percent, message } => eprintln!("[{percent}] {message}"),
            OverlayState::Failed { reason } => eprintln!("[fail] {reason}"),
        }
    }

    /// Overlay state after the last call.
    pub fn overlay(&self) -> &ProgressOverlay {
        &self.overlay
    }
}

impl ProgressSink for ConsoleSink {
    fn show(&mut self, percent: Percent, message: &str) {
        let before = self.overlay.revision();
        self.overlay.show(percent, message);
        self.echo(before);
    }

    fn hide(&mut self) {
        self.overlay.hide();
    }

    fn fail(&mut self, reason: &str) {
        let before = self.overlay.revision();
        self.overlay.fail(reason);
        self.echo(before);
    }
}

fn build_fetcher(prefs: &PreviewPrefs) -> Result<AssetFetcher> {
    let mut fetcher =
        AssetFetcher::new(cli::read_mode(prefs.loader.read_mode)).context("build http client")?;
    if let Some(base) = &prefs.loader.base_url {
        let base = Url::parse(base).with_context(|| format!("invalid base url `{base}`"))?;
        fetcher = fetcher.with_base(base);
    }
    Ok(fetcher)
}

/// Summary of a finished preview.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreviewReport {
    pub outcome: LoadOutcome,
    pub frames: u32,
    pub camera: Option<CameraState>,
}

type Coordinator = LoadCoordinator<AssetFetcher, ConsoleSink, GltfTarget>;

/// Settle the load for `source`, then drive up to `frames` preview frames.
///
/// Resolving `interrupt` tears the coordinator down and returns `None`.
pub(crate) async fn preview(
    coord: &mut Coordinator,
    source: AssetSource,
    mut ticker: FrameTicker,
    frames: u32,
    params: &dolly_shot::ShotParameters,
    interrupt: impl Future<Output = ()>,
) -> Option<PreviewReport> {
    tokio::pin!(interrupt);
    coord.begin_load(source);

    let settled = tokio::select! {
        outcome = coord.settle() => outcome,
        () = &mut interrupt => None,
    };
    let Some(outcome) = settled else {
        warn!("interrupted before the model settled");
        coord.teardown();
        return None;
    };

    let mut report = PreviewReport {
        outcome,
        frames: 0,
        camera: None,
    };
    if !report.outcome.is_ready() {
        return Some(report);
    }

    let mut tracker = FocusTracker::new();
    while report.frames < frames {
        let t = tokio::select! {
            t = ticker.next_frame() => t,
            () = &mut interrupt => None,
        };
        let Some(t) = t else {
            break;
        };
        coord.target_mut().refresh();
        tracker.observe(coord.target().scene());
        let camera = solve_pose(t, params, &tracker.volume()).to_camera_state(params.fov_deg());
        coord.target_mut().set_camera(&camera);
        report.camera = Some(camera);
        report.frames += 1;
    }
    ticker.stop();
    Some(report)
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// `dolly load`
pub(crate) async fn run_load(args: &LoadArgs, prefs: &mut PreviewPrefs) -> Result<()> {
    args.loader.apply(&mut prefs.loader);
    let params = args.shot.apply(&mut prefs.shot);
    if args.paused {
        prefs.shot.playing = false;
    }

    let raw = args
        .source
        .clone()
        .or_else(|| prefs.loader.last_remote.clone())
        .ok_or_else(|| anyhow!("no source given and no previous remote model"))?;
    let source = cli::parse_source(&raw);

    let config = LoaderConfig {
        timeout: cli::timeout(&prefs.loader),
        ..LoaderConfig::default()
    };
    let mut coord = LoadCoordinator::new(
        build_fetcher(prefs)?,
        ConsoleSink::default(),
        GltfTarget::offloaded(),
        config,
    );
    let period = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let ticker = FrameTicker::new(ShotClock::new(prefs.shot.playing), period);

    info!(%source, "loading");
    let Some(report) =
        preview(&mut coord, source.clone(), ticker, args.frames, &params, ctrl_c()).await
    else {
        return Err(anyhow!("interrupted"));
    };

    let result = match &report.outcome {
        LoadOutcome::Ready { confirmed, .. } => {
            if let AssetSource::Remote(url) = &source {
                prefs.loader.last_remote = Some(url.clone());
            }
            println!("{}", report_table(&report, coord.target(), *confirmed));
            Ok(())
        }
        LoadOutcome::Failed { reason, .. } => Err(anyhow!("load failed: {reason}")),
    };
    coord.teardown();
    result
}

fn report_table(report: &PreviewReport, target: &GltfTarget, confirmed: bool) -> Table {
    let summary = target.summary();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["field", "value"]);
    table.add_row(vec![
        "ready".to_owned(),
        if confirmed { "confirmed" } else { "forced" }.to_owned(),
    ]);
    table.add_row(vec!["nodes".to_owned(), summary.nodes.to_string()]);
    table.add_row(vec!["meshes".to_owned(), summary.meshes.to_string()]);
    table.add_row(vec!["frames".to_owned(), report.frames.to_string()]);
    if let Some(cam) = &report.camera {
        let p = cam.position;
        let t = cam.target;
        table.add_row(vec![
            "camera".to_owned(),
            format!("{:.3}, {:.3}, {:.3}", p.x, p.y, p.z),
        ]);
        table.add_row(vec![
            "look at".to_owned(),
            format!("{:.3}, {:.3}, {:.3}", t.x, t.y, t.z),
        ]);
        table.add_row(vec![
            "fov".to_owned(),
            format!("{:.1}°", cam.fov_y_radians.to_degrees()),
        ]);
    }
    table
}

/// `dolly manifest`
pub(crate) async fn run_manifest(args: &ManifestArgs, prefs: &mut PreviewPrefs) -> Result<()> {
    args.loader.apply(&mut prefs.loader);
    let location = args
        .location
        .clone()
        .or_else(|| prefs.loader.manifest.clone())
        .unwrap_or_else(|| DEFAULT_MANIFEST.to_owned());
    let fetcher = build_fetcher(prefs)?;
    let entries = load_manifest(&fetcher, &cli::parse_source(&location)).await;
    if entries.is_empty() {
        println!("no models listed in {location}");
        return Ok(());
    }
    prefs.loader.manifest = Some(location);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["label", "url"]);
    for entry in &entries {
        table.add_row(vec![entry.label.clone(), entry.url.clone()]);
    }
    println!("{table}");
    Ok(())
}
