// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GltfTarget against hand-built GLB payloads.
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use bytes::Bytes;
use dolly_scene_gltf::{parse_scene, GltfTarget};
use dolly_scene_port::{
    BlobHandle, BlobId, BlobKind, OrbitConfig, RenderAck, RenderError, RenderOutcome,
    RenderTarget, SceneId,
};
use dolly_shot::{world_bounds, FocusTracker};
use glam::Vec3;
use tokio::sync::oneshot;

/// Parent node translated to x=10 with a child scaled by 2 carrying a unit-cube triangle.
const JSON: &str = r#"{
  "asset": {"version": "2.0"},
  "scene": 0,
  "scenes": [{"nodes": [0]}],
  "nodes": [
    {"translation": [10.0, 0.0, 0.0], "children": [1]},
    {"mesh": 0, "scale": [2.0, 2.0, 2.0]}
  ],
  "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
  "buffers": [{"byteLength": 36}],
  "bufferViews": [{"buffer": 0, "byteLength": 36}],
  "accessors": [{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0]
  }]
}"#;

fn pad(mut chunk: Vec<u8>, fill: u8) -> Vec<u8> {
    while chunk.len() % 4 != 0 {
        chunk.push(fill);
    }
    chunk
}

fn glb(json: &str) -> Vec<u8> {
    let json = pad(json.as_bytes().to_vec(), b' ');
    let mut bin = Vec::new();
    for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0] {
        bin.extend_from_slice(&v.to_le_bytes());
    }
    let bin = pad(bin, 0);
    let total = 12 + 8 + json.len() + 8 + bin.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

fn blob(id: u64, bytes: Vec<u8>) -> BlobHandle {
    BlobHandle::new(BlobId(id), BlobKind::Local, "test.glb", Bytes::from(bytes))
}

fn capture() -> (Arc<Mutex<Option<RenderOutcome>>>, RenderAck) {
    let slot = Arc::new(Mutex::new(None));
    let out = Arc::clone(&slot);
    (slot, RenderAck::new(move |o| *out.lock().unwrap() = Some(o)))
}

#[test]
fn hierarchy_and_bounds_come_from_the_document() {
    let (graph, summary) = parse_scene(SceneId(1), &glb(JSON)).unwrap();
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.bounded_primitives, 1);
    assert_eq!(graph.roots(), &[0]);
    assert_eq!(graph.nodes()[0].children, vec![1]);

    let b = world_bounds(&graph).unwrap();
    assert_eq!(b.min(), Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(b.max(), Vec3::new(12.0, 2.0, 2.0));
}

#[test]
fn ready_ack_and_focus_follow_the_asset() {
    let mut target = GltfTarget::new();
    let (slot, ack) = capture();
    target.assign(&blob(7, glb(JSON)), &OrbitConfig::default(), ack);
    assert_eq!(*slot.lock().unwrap(), Some(RenderOutcome::Ready));
    assert_eq!(target.shown(), Some(BlobId(7)));

    let mut tracker = FocusTracker::new();
    assert!(tracker.observe(target.scene()));
    let v = tracker.volume();
    assert_relative_eq!(v.radius, 1.0);
    assert_relative_eq!(v.height, 2.0);
    assert_eq!(v.center, Vec3::new(11.0, 1.0, 1.0));
}

#[test]
fn garbage_is_rejected_and_previous_scene_kept() {
    let mut target = GltfTarget::new();
    let (_, ack) = capture();
    target.assign(&blob(1, glb(JSON)), &OrbitConfig::default(), ack);

    let (slot, ack) = capture();
    target.assign(&blob(2, b"not a model".to_vec()), &OrbitConfig::default(), ack);
    assert!(matches!(
        *slot.lock().unwrap(),
        Some(RenderOutcome::Error(RenderError::Decode(_)))
    ));
    assert_eq!(target.shown(), Some(BlobId(1)));
    assert_eq!(target.scene().map(|s| s.id()), Some(SceneId(1)));
}

#[test]
fn document_without_scenes_is_empty_but_valid() {
    let json = r#"{"asset":{"version":"2.0"}}"#;
    let (graph, summary) = parse_scene(SceneId(3), json.as_bytes()).unwrap();
    assert!(graph.roots().is_empty());
    assert_eq!(summary.nodes, 0);
    assert!(world_bounds(&graph).is_none());
}

#[test]
fn dispose_clears_the_scene() {
    let mut target = GltfTarget::new();
    let (_, ack) = capture();
    target.assign(&blob(4, glb(JSON)), &OrbitConfig::default(), ack);
    target.dispose();
    assert!(target.scene().is_none());
    assert!(target.is_disposed());
}

fn signal() -> (oneshot::Receiver<RenderOutcome>, RenderAck) {
    let (tx, rx) = oneshot::channel();
    (
        rx,
        RenderAck::new(move |o| {
            let _ = tx.send(o);
        }),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn offloaded_parse_waits_for_refresh() {
    let mut target = GltfTarget::offloaded();
    let (rx, ack) = signal();
    target.assign(&blob(5, glb(JSON)), &OrbitConfig::default(), ack);
    assert_eq!(rx.await.unwrap(), RenderOutcome::Ready);
    assert!(target.scene().is_none());

    target.refresh();
    assert_eq!(target.shown(), Some(BlobId(5)));
    assert_eq!(target.scene().map(|s| s.id()), Some(SceneId(5)));
    assert_eq!(target.summary().nodes, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn offloaded_target_installs_only_the_latest_assignment() {
    let mut target = GltfTarget::offloaded();
    let (first, ack) = signal();
    target.assign(&blob(1, glb(JSON)), &OrbitConfig::default(), ack);
    let (second, ack) = signal();
    target.assign(&blob(2, glb(JSON)), &OrbitConfig::default(), ack);
    assert_eq!(first.await.unwrap(), RenderOutcome::Ready);
    assert_eq!(second.await.unwrap(), RenderOutcome::Ready);
    target.refresh();
    assert_eq!(target.shown(), Some(BlobId(2)));

    let (valid, ack) = signal();
    target.assign(&blob(3, glb(JSON)), &OrbitConfig::default(), ack);
    let (garbage, ack) = signal();
    target.assign(&blob(4, b"not a model".to_vec()), &OrbitConfig::default(), ack);
    assert_eq!(valid.await.unwrap(), RenderOutcome::Ready);
    assert!(matches!(
        garbage.await.unwrap(),
        RenderOutcome::Error(RenderError::Decode(_))
    ));
    target.refresh();
    assert_eq!(target.shown(), Some(BlobId(2)));
}

#[test]
fn offloaded_target_parses_inline_without_a_runtime() {
    let mut target = GltfTarget::offloaded();
    let (slot, ack) = capture();
    target.assign(&blob(6, glb(JSON)), &OrbitConfig::default(), ack);
    assert_eq!(*slot.lock().unwrap(), Some(RenderOutcome::Ready));
    assert_eq!(target.shown(), Some(BlobId(6)));
}
