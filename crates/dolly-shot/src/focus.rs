// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Focus volume tracking.

use dolly_geom::Aabb;
use dolly_scene_port::{SceneGraph, SceneId};
use glam::{Mat4, Vec3};
use tracing::debug;

/// Region the shot frames. Always present; replaced wholesale, never patched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusVolume {
    /// World-space center of the subject.
    pub center: Vec3,
    /// Half the largest extent of the subject.
    pub radius: f32,
    /// Vertical size of the subject.
    pub height: f32,
}

impl Default for FocusVolume {
    /// Placeholder used while nothing is loaded: roughly a person-sized box above the origin.
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 0.45, 0.0),
            radius: 1.0,
            height: 1.2,
        }
    }
}

impl FocusVolume {
    /// Derive a volume from world bounds. Degenerate extents fall back to radius 1.
    pub fn from_bounds(bounds: &Aabb) -> Self {
        let radius = 0.5 * bounds.max_extent();
        let radius = if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            1.0
        };
        Self {
            center: bounds.center(),
            radius,
            height: bounds.size().y.max(0.0),
        }
    }
}

/// World-space bounds of every mesh-bearing node in `scene`.
///
/// Returns `None` when no node carries bounds. Node indices that are out of
/// range or revisited (a malformed cycle) are skipped.
pub fn world_bounds(scene: &SceneGraph) -> Option<Aabb> {
    let mut visited = vec![false; scene.nodes().len()];
    let mut stack: Vec<(usize, Mat4)> = scene
        .roots()
        .iter()
        .rev()
        .map(|&root| (root, Mat4::IDENTITY))
        .collect();
    let mut acc: Option<Aabb> = None;

    while let Some((index, parent)) = stack.pop() {
        let Some(node) = scene.node(index) else {
            continue;
        };
        if std::mem::replace(&mut visited[index], true) {
            continue;
        }
        let world = parent * node.transform.to_mat4();
        if let Some(local) = &node.bounds {
            let placed = local.transformed(&world);
            acc = Some(match acc {
                Some(a) => a.union(&placed),
                None => placed,
            });
        }
        stack.extend(node.children.iter().rev().map(|&child| (child, world)));
    }
    acc
}

/// Watches the render target's scene and keeps the focus volume current.
#[derive(Debug, Default)]
pub struct FocusTracker {
    volume: FocusVolume,
    scene: Option<SceneId>,
}

impl FocusTracker {
    /// Tracker holding the placeholder volume.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current focus volume.
    pub fn volume(&self) -> FocusVolume {
        self.volume
    }

    /// Observe the scene displayed this frame. Returns `true` if the volume changed.
    pub fn observe(&mut self, scene: Option<&SceneGraph>) -> bool {
        let id = scene.map(SceneGraph::id);
        if id == self.scene {
            return false;
        }
        self.scene = id;
        let next = scene
            .and_then(world_bounds)
            .map(|b| FocusVolume::from_bounds(&b))
            .unwrap_or_default();
        debug!(scene = ?id, center = ?next.center, radius = next.radius, "focus volume replaced");
        let changed = next != self.volume;
        self.volume = next;
        changed
    }
}
