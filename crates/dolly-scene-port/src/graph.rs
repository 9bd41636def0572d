// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Minimal scene graph exposed by targets for focus tracking.
//!
//! Targets publish only what the camera model needs: node hierarchy,
//! local transforms and local mesh bounds. Geometry stays in the target.

use dolly_geom::{Aabb, Transform};

/// Identity of an installed scene. A new id means "the loaded scene changed".
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(pub u64);

/// One node of the hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneNode {
    /// Transform relative to the parent node.
    pub transform: Transform,
    /// Mesh bounds in node-local space, if the node carries geometry.
    pub bounds: Option<Aabb>,
    /// Indices of child nodes within the owning graph.
    pub children: Vec<usize>,
}

/// Flattened scene hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGraph {
    id: SceneId,
    nodes: Vec<SceneNode>,
    roots: Vec<usize>,
}

impl SceneGraph {
    /// Build a graph; `roots` index into `nodes`.
    pub fn new(id: SceneId, nodes: Vec<SceneNode>, roots: Vec<usize>) -> Self {
        Self { id, nodes, roots }
    }

    /// Scene identity.
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// All nodes.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Root node indices.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Node by index.
    pub fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }
}
