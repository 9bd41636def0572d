// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render target port contract for Dolly.
//!
//! This crate defines the boundary between the load coordinator and whatever
//! actually draws the asset. It contains NO decoding or drawing logic; adapters
//! (`dolly-scene-gltf`, GPU renderers, test fakes) implement [`RenderTarget`].
//!
//! # Design Principles
//!
//! - **Targets are dumb**: they receive blobs and camera state. No load logic.
//! - **No time ownership**: all timing (clock, timeouts) comes from the app.
//! - **One acknowledgment per assignment**: [`RenderAck`] is consumed by value,
//!   so a target cannot signal both ready and error for the same blob.

use thiserror::Error;

/// Error reported by a render target after receiving a blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The asset bytes could not be parsed.
    #[error("decode error: {0}")]
    Decode(String),
    /// The asset parsed but references something the target cannot use.
    #[error("unsupported asset: {0}")]
    Unsupported(String),
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(String),
}

mod blob;
mod camera;
mod graph;
mod port;

pub use blob::{BlobHandle, BlobId, BlobKind};
pub use camera::{CameraState, OrbitConfig, OrbitRadius, OrbitTarget};
pub use graph::{SceneGraph, SceneId, SceneNode};
pub use port::{RenderAck, RenderOutcome, RenderTarget};
