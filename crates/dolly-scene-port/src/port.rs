// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render target trait defining the loader ↔ renderer contract.

use std::fmt;

use crate::{BlobHandle, CameraState, OrbitConfig, RenderError, SceneGraph};

/// Terminal signal for one assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The target finished installing the asset.
    Ready,
    /// The target rejected the asset.
    Error(RenderError),
}

/// One-shot acknowledgment for a single [`RenderTarget::assign`] call.
///
/// Consumed by value: a target can signal at most once per assignment.
/// Dropping it without signalling is allowed; the caller's timeout covers that.
pub struct RenderAck {
    notify: Box<dyn FnOnce(RenderOutcome) + Send>,
}

impl RenderAck {
    /// Wrap a callback that receives the outcome.
    pub fn new(notify: impl FnOnce(RenderOutcome) + Send + 'static) -> Self {
        Self {
            notify: Box::new(notify),
        }
    }

    /// Signal success.
    pub fn ready(self) {
        self.resolve(RenderOutcome::Ready);
    }

    /// Signal failure.
    pub fn error(self, err: RenderError) {
        self.resolve(RenderOutcome::Error(err));
    }

    /// Signal an explicit outcome.
    pub fn resolve(self, outcome: RenderOutcome) {
        (self.notify)(outcome);
    }
}

impl fmt::Debug for RenderAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderAck(..)")
    }
}

/// Render target port trait.
///
/// Implementors receive blobs and camera state and draw. They never decide
/// which load is current; the coordinator only assigns blobs for live tickets.
///
/// # Acknowledgment Semantics
///
/// Every `assign` carries a fresh [`RenderAck`]. The target resolves it exactly
/// once when the asset is displayed or rejected. A target that replaces an
/// assignment before it finished may drop the older ack.
pub trait RenderTarget {
    /// Install a new asset source with its initial orbit configuration.
    fn assign(&mut self, blob: &BlobHandle, orbit: &OrbitConfig, ack: RenderAck);

    /// Reapply an orbit configuration (e.g. a "reset view" request).
    fn set_orbit(&mut self, orbit: &OrbitConfig);

    /// Set the shot camera for the current frame.
    fn set_camera(&mut self, camera: &CameraState);

    /// Scene graph of the currently displayed asset, if any.
    fn scene(&self) -> Option<&SceneGraph>;

    /// Fold in installs the target finished off the owner's thread.
    ///
    /// The owner calls this once a load resolves ready and before each frame.
    /// Targets that install inside `assign` keep the default no-op.
    fn refresh(&mut self) {}

    /// Release all resources.
    fn dispose(&mut self);
}
