// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! glTF document → scene graph.

use dolly_geom::{Aabb, Transform};
use dolly_scene_port::{RenderError, SceneGraph, SceneId, SceneNode};
use glam::Vec3;
use gltf::json::Value;
use gltf::{Gltf, Semantic};

/// Counts reported after a successful parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssetSummary {
    /// Nodes in the document.
    pub nodes: usize,
    /// Meshes in the document.
    pub meshes: usize,
    /// Primitives that contributed bounds.
    pub bounded_primitives: usize,
}

fn vec3(value: Option<Value>) -> Option<Vec3> {
    let value = value?;
    let arr = value.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    let mut out = [0.0f32; 3];
    for (slot, v) in out.iter_mut().zip(arr) {
        *slot = v.as_f64()? as f32;
    }
    Some(Vec3::from_array(out))
}

fn mesh_bounds(mesh: &gltf::Mesh<'_>, summary: &mut AssetSummary) -> Option<Aabb> {
    let mut acc: Option<Aabb> = None;
    for primitive in mesh.primitives() {
        let Some(positions) = primitive.get(&Semantic::Positions) else {
            continue;
        };
        let (Some(min), Some(max)) = (vec3(positions.min()), vec3(positions.max())) else {
            continue;
        };
        let Some(bounds) = Aabb::new(min, max) else {
            continue;
        };
        summary.bounded_primitives += 1;
        acc = Some(acc.map_or(bounds, |a| a.union(&bounds)));
    }
    acc
}

/// Parse glTF or GLB bytes into a scene graph tagged `id`.
///
/// Uses the default scene, or the first scene when none is marked default.
/// A document without scenes yields an empty graph.
pub fn parse_scene(id: SceneId, bytes: &[u8]) -> Result<(SceneGraph, AssetSummary), RenderError> {
    let gltf = Gltf::from_slice(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
    let mut summary = AssetSummary {
        nodes: gltf.nodes().len(),
        meshes: gltf.meshes().len(),
        bounded_primitives: 0,
    };

    let nodes = gltf
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();
            SceneNode {
                transform: Transform::from_decomposed(t, r, s),
                bounds: node.mesh().and_then(|m| mesh_bounds(&m, &mut summary)),
                children: node.children().map(|c| c.index()).collect(),
            }
        })
        .collect();

    let roots = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .map(|scene| scene.nodes().map(|n| n.index()).collect())
        .unwrap_or_default();

    Ok((SceneGraph::new(id, nodes, roots), summary))
}
