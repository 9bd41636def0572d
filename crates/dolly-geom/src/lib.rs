// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Geometry primitives for Dolly.

This crate provides:
- Axis-aligned bounding boxes (`Aabb`) used to size the focus volume.
- Node transforms (`Transform`) used to place scene-graph bounds in world space.

Design notes:
- Float32 throughout, matching `glam` and the render-side scene graph.
- Constructors never panic; degenerate input is reported through `Option`.
"]

/// Foundational geometric types.
pub mod types;

pub use types::aabb::Aabb;
pub use types::transform::Transform;
