// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render target fake that records assignments and can hold acknowledgments.

use std::sync::{Arc, Mutex, MutexGuard};

use dolly_geom::{Aabb, Transform};
use dolly_scene_port::{
    BlobHandle, BlobId, BlobKind, CameraState, OrbitConfig, RenderAck, RenderError,
    RenderOutcome, RenderTarget, SceneGraph, SceneId, SceneNode,
};
use glam::Vec3;

/// How the fake answers an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AckMode {
    /// Acknowledge ready during `assign`.
    #[default]
    Ready,
    /// Reject during `assign` with a decode error.
    Error(String),
    /// Keep the ack until the test resolves it (or never).
    Hold,
}

/// Record of one `assign` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Blob handed over.
    pub blob: BlobId,
    /// Blob kind.
    pub kind: BlobKind,
    /// Blob label.
    pub label: String,
    /// Payload size.
    pub len: usize,
    /// Orbit handed over.
    pub orbit: OrbitConfig,
}

#[derive(Default)]
struct State {
    mode: AckMode,
    assignments: Vec<Assignment>,
    held: Vec<RenderAck>,
    orbits: Vec<OrbitConfig>,
    cameras: Vec<CameraState>,
    refreshes: usize,
    disposed: usize,
}

/// [`RenderTarget`] fake. Observe it through a [`MockTargetProbe`].
///
/// Every assignment installs a one-node scene whose id equals the blob id and
/// whose bounds are a cube with edge length equal to the payload size.
#[derive(Default)]
pub struct MockTarget {
    state: Arc<Mutex<State>>,
    scene: Option<SceneGraph>,
}

/// Shared view into a [`MockTarget`].
#[derive(Clone)]
pub struct MockTargetProbe {
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockTarget {
    /// Fake answering with `mode`.
    pub fn new(mode: AckMode) -> Self {
        let target = Self::default();
        lock(&target.state).mode = mode;
        target
    }

    /// Probe sharing this target's records.
    pub fn probe(&self) -> MockTargetProbe {
        MockTargetProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl RenderTarget for MockTarget {
    fn assign(&mut self, blob: &BlobHandle, orbit: &OrbitConfig, ack: RenderAck) {
        let edge = blob.len().max(1) as f32;
        self.scene = Some(SceneGraph::new(
            SceneId(blob.id().0),
            vec![SceneNode {
                transform: Transform::identity(),
                bounds: Aabb::new(Vec3::ZERO, Vec3::splat(edge)),
                children: Vec::new(),
            }],
            vec![0],
        ));
        let mode = {
            let mut state = lock(&self.state);
            state.assignments.push(Assignment {
                blob: blob.id(),
                kind: blob.kind(),
                label: blob.label().to_owned(),
                len: blob.len(),
                orbit: *orbit,
            });
            state.mode.clone()
        };
        match mode {
            AckMode::Ready => ack.ready(),
            AckMode::Error(msg) => ack.error(RenderError::Decode(msg)),
            AckMode::Hold => lock(&self.state).held.push(ack),
        }
    }

    fn set_orbit(&mut self, orbit: &OrbitConfig) {
        lock(&self.state).orbits.push(*orbit);
    }

    fn set_camera(&mut self, camera: &CameraState) {
        lock(&self.state).cameras.push(*camera);
    }

    fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    fn refresh(&mut self) {
        lock(&self.state).refreshes += 1;
    }

    fn dispose(&mut self) {
        self.scene = None;
        lock(&self.state).disposed += 1;
    }
}

impl MockTargetProbe {
    /// Change how later assignments are answered.
    pub fn set_mode(&self, mode: AckMode) {
        lock(&self.state).mode = mode;
    }

    /// Every assignment so far.
    pub fn assignments(&self) -> Vec<Assignment> {
        lock(&self.state).assignments.clone()
    }

    /// Acks waiting for the test.
    pub fn held_count(&self) -> usize {
        lock(&self.state).held.len()
    }

    /// Resolve the oldest held ack. Returns `false` if none is held.
    pub fn resolve_oldest(&self, outcome: RenderOutcome) -> bool {
        let ack = {
            let mut state = lock(&self.state);
            if state.held.is_empty() {
                return false;
            }
            state.held.remove(0)
        };
        ack.resolve(outcome);
        true
    }

    /// Resolve the newest held ack. Returns `false` if none is held.
    pub fn resolve_latest(&self, outcome: RenderOutcome) -> bool {
        let ack = lock(&self.state).held.pop();
        match ack {
            Some(ack) => {
                ack.resolve(outcome);
                true
            }
            None => false,
        }
    }

    /// Orbits applied via `set_orbit`.
    pub fn orbits(&self) -> Vec<OrbitConfig> {
        lock(&self.state).orbits.clone()
    }

    /// Most recent camera.
    pub fn last_camera(&self) -> Option<CameraState> {
        lock(&self.state).cameras.last().copied()
    }

    /// Number of `refresh` calls.
    pub fn refresh_count(&self) -> usize {
        lock(&self.state).refreshes
    }

    /// Number of `dispose` calls.
    pub fn dispose_count(&self) -> usize {
        lock(&self.state).disposed
    }
}
