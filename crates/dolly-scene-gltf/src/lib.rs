// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless glTF/GLB render target.
//!
//! Parses the assigned asset into a [`SceneGraph`](dolly_scene_port::SceneGraph)
//! (node hierarchy, local transforms, POSITION accessor bounds) and
//! acknowledges the assignment. No GPU work happens here; the CLI uses it to
//! drive focus tracking and camera output without a window.

mod parse;
mod target;

pub use parse::{parse_scene, AssetSummary};
pub use target::GltfTarget;
