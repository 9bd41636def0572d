// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless render target that keeps only the parsed scene graph.
//!
//! An offloaded target parses on the blocking pool and parks the result in an
//! inbox; [`RenderTarget::refresh`] installs it on the owner's side. Only the
//! most recent assignment is ever installed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dolly_scene_port::{
    BlobHandle, BlobId, CameraState, OrbitConfig, RenderAck, RenderTarget, SceneGraph, SceneId,
};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::parse::{parse_scene, AssetSummary};

#[derive(Debug)]
struct Parsed {
    blob: BlobId,
    graph: SceneGraph,
    summary: AssetSummary,
    orbit: OrbitConfig,
}

type Inbox = Arc<Mutex<Vec<Parsed>>>;

fn lock(inbox: &Inbox) -> MutexGuard<'_, Vec<Parsed>> {
    inbox.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Parse `blob`, rejecting it through `ack` on failure. On success the ack is
/// handed back so the caller can signal ready once the scene is reachable.
fn parse_or_reject(
    blob: &BlobHandle,
    orbit: OrbitConfig,
    ack: RenderAck,
) -> Option<(Parsed, RenderAck)> {
    match parse_scene(SceneId(blob.id().0), blob.bytes()) {
        Ok((graph, summary)) => {
            debug!(blob = %blob.id(), label = blob.label(), nodes = summary.nodes, "asset parsed");
            let parsed = Parsed {
                blob: blob.id(),
                graph,
                summary,
                orbit,
            };
            Some((parsed, ack))
        }
        Err(err) => {
            warn!(blob = %blob.id(), label = blob.label(), %err, "asset rejected");
            ack.error(err);
            None
        }
    }
}

/// Render target that parses assets and keeps only their scene graph.
///
/// Acknowledges each assignment once: `ready` after the parse, `error` for
/// bytes that are not glTF. A rejected asset leaves the previous scene
/// displayed.
#[derive(Debug, Default)]
pub struct GltfTarget {
    scene: Option<SceneGraph>,
    shown: Option<BlobId>,
    summary: AssetSummary,
    orbit: OrbitConfig,
    camera: Option<CameraState>,
    disposed: bool,
    offload: bool,
    expected: Option<BlobId>,
    inbox: Inbox,
}

impl GltfTarget {
    /// Target that parses inside `assign` and acks before returning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target that parses on the blocking pool when a tokio runtime is
    /// running, so a large asset never stalls the owner.
    ///
    /// The ready ack fires after the parse lands in the inbox; call
    /// [`refresh`](RenderTarget::refresh) to install it. Without a runtime
    /// this behaves like [`new`](Self::new).
    pub fn offloaded() -> Self {
        Self {
            offload: true,
            ..Self::default()
        }
    }

    /// Blob currently displayed.
    pub fn shown(&self) -> Option<BlobId> {
        self.shown
    }

    /// Counts for the displayed asset.
    pub fn summary(&self) -> AssetSummary {
        self.summary
    }

    /// Orbit last applied.
    pub fn orbit(&self) -> &OrbitConfig {
        &self.orbit
    }

    /// Camera last applied.
    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    /// Whether `dispose` ran.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn install(&mut self, parsed: Parsed) {
        self.scene = Some(parsed.graph);
        self.shown = Some(parsed.blob);
        self.summary = parsed.summary;
        self.orbit = parsed.orbit;
        self.disposed = false;
    }
}

impl RenderTarget for GltfTarget {
    fn assign(&mut self, blob: &BlobHandle, orbit: &OrbitConfig, ack: RenderAck) {
        let handle = if self.offload {
            Handle::try_current().ok()
        } else {
            None
        };
        let Some(handle) = handle else {
            self.expected = None;
            if let Some((parsed, ack)) = parse_or_reject(blob, *orbit, ack) {
                self.install(parsed);
                ack.ready();
            }
            return;
        };

        self.expected = Some(blob.id());
        let inbox = Arc::clone(&self.inbox);
        let blob = blob.clone();
        let orbit = *orbit;
        drop(handle.spawn_blocking(move || {
            if let Some((parsed, ack)) = parse_or_reject(&blob, orbit, ack) {
                lock(&inbox).push(parsed);
                ack.ready();
            }
        }));
    }

    fn set_orbit(&mut self, orbit: &OrbitConfig) {
        self.orbit = *orbit;
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = Some(*camera);
    }

    fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    fn refresh(&mut self) {
        let landed: Vec<Parsed> = lock(&self.inbox).drain(..).collect();
        for parsed in landed {
            if Some(parsed.blob) == self.expected {
                self.expected = None;
                self.install(parsed);
            } else {
                debug!(blob = %parsed.blob, "dropping superseded parse");
            }
        }
    }

    fn dispose(&mut self) {
        self.scene = None;
        self.shown = None;
        self.summary = AssetSummary::default();
        self.expected = None;
        lock(&self.inbox).clear();
        self.disposed = true;
    }
}
