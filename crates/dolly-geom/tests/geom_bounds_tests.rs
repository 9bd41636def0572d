// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used)]
//! Integration tests for dolly-geom bounds under node transforms.

use approx::assert_relative_eq;
use dolly_geom::{Aabb, Transform};
use glam::{Quat, Vec3};

#[test]
fn translated_cube_moves_bounds() {
    let local = Aabb::from_center_half_extents(Vec3::ZERO, 1.0, 1.0, 1.0).unwrap();
    let t = Transform::from_translation(Vec3::new(10.0, 0.0, 0.0));
    let world = local.transformed(&t.to_mat4());
    assert_eq!(world.min(), Vec3::new(9.0, -1.0, -1.0));
    assert_eq!(world.max(), Vec3::new(11.0, 1.0, 1.0));
}

#[test]
fn rotated_box_grows_to_contain_corners() {
    // 2x1x1 box rotated 90 degrees around Y swaps the X and Z extents.
    let local = Aabb::new(Vec3::new(-1.0, -0.5, -0.5), Vec3::new(1.0, 0.5, 0.5)).unwrap();
    let t = Transform::new(
        Vec3::ZERO,
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Vec3::ONE,
    );
    let world = local.transformed(&t.to_mat4());
    let size = world.size();
    assert_relative_eq!(size.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(size.y, 1.0, epsilon = 1e-5);
    assert_relative_eq!(size.z, 2.0, epsilon = 1e-5);
}

#[test]
fn scale_applies_before_translation() {
    let local = Aabb::new(Vec3::ZERO, Vec3::ONE).unwrap();
    let t = Transform::from_decomposed([0.0, 5.0, 0.0], [0.0, 0.0, 0.0, 1.0], [2.0, 3.0, 4.0]);
    let world = local.transformed(&t.to_mat4());
    assert_eq!(world.min(), Vec3::new(0.0, 5.0, 0.0));
    assert_eq!(world.max(), Vec3::new(2.0, 8.0, 4.0));
}

#[test]
fn degenerate_rotation_falls_back_to_identity() {
    let t = Transform::from_decomposed([0.0; 3], [0.0; 4], [1.0; 3]);
    assert_eq!(t.rotation(), Quat::IDENTITY);
}

#[test]
fn union_covers_both_inputs() {
    let a = Aabb::new(Vec3::ZERO, Vec3::ONE).unwrap();
    let b = Aabb::new(Vec3::new(-2.0, 0.5, 0.0), Vec3::new(-1.0, 3.0, 0.5)).unwrap();
    let u = a.union(&b);
    assert_eq!(u.min(), Vec3::new(-2.0, 0.0, 0.0));
    assert_eq!(u.max(), Vec3::new(1.0, 3.0, 1.0));
    assert_relative_eq!(u.max_extent(), 3.0);
}
