// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the focus tracker (transform, AABB).
//!
//! Bounds are always world-space once they leave the scene graph walk; the
//! tracker never mixes local and world boxes.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "Node transforms with non-uniform scale."]
pub mod transform;
