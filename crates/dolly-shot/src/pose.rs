// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pose solver: `(t, shot, focus) -> camera pose`.
//!
//! Pure and deterministic. The omniscient view (which draws the shot camera's
//! frustum) and the in-shot view both call [`solve_pose`] with the same inputs
//! every frame, so they always agree on where the camera is.

use dolly_scene_port::CameraState;
use glam::Vec3;

use crate::focus::FocusVolume;
use crate::params::{ShotParameters, ShotStyle};

/// Floor on the shot distance so tiny subjects still get a usable frame.
pub const MIN_BASE_RADIUS: f32 = 0.5;
/// Floor on the horizontal radius; keeps the camera off the vertical axis at steep angles.
pub const MIN_HORIZONTAL_RADIUS: f32 = 1e-3;
/// Near plane of the in-shot camera.
pub const SHOT_NEAR: f32 = 0.05;
/// Far plane of the in-shot camera.
pub const SHOT_FAR: f32 = 200.0;

/// Camera position and look-at target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: Vec3,
    /// Look-at point in world space.
    pub target: Vec3,
}

impl CameraPose {
    /// Convert to a render-target camera with the given field of view.
    pub fn to_camera_state(&self, fov_deg: f32) -> CameraState {
        CameraState {
            position: self.position,
            target: self.target,
            up: Vec3::Y,
            fov_y_radians: fov_deg.to_radians(),
            near: SHOT_NEAR,
            far: SHOT_FAR,
        }
    }
}

/// Time-independent quantities derived from the shot and the subject size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotGeometry {
    /// Elevation in radians.
    pub elevation: f32,
    /// Distance from the target along the view direction.
    pub base_radius: f32,
    /// Horizontal component of `base_radius`.
    pub horizontal_radius: f32,
    /// Vertical component of `base_radius`.
    pub vertical_offset: f32,
    /// Motion excursion for DOLLY/TRUCK/CRANE.
    pub amplitude: f32,
    /// Height of the look-at point.
    pub target_y: f32,
}

impl ShotGeometry {
    /// Derive the geometry for `params` framing `focus`.
    pub fn derive(params: &ShotParameters, focus: &FocusVolume) -> Self {
        let elevation = params.angle().degrees().to_radians();
        let base_radius =
            (params.distance().scale() * (focus.radius * 2.0).max(1.0)).max(MIN_BASE_RADIUS);
        Self {
            elevation,
            base_radius,
            horizontal_radius: (base_radius * elevation.cos()).max(MIN_HORIZONTAL_RADIUS),
            vertical_offset: base_radius * elevation.sin(),
            // Capped by both shot distance and subject size so the camera never
            // swings inside the subject.
            amplitude: (base_radius * 0.35).min(focus.radius * 1.2),
            target_y: focus.center.y + focus.radius * 0.1,
        }
    }
}

/// Offset of the camera from `(center.x, target_y, center.z)` for one style.
fn motion_offset(style: ShotStyle, phase: f32, g: &ShotGeometry) -> Vec3 {
    match style {
        ShotStyle::Static => Vec3::new(g.horizontal_radius, g.vertical_offset, 0.0),
        ShotStyle::Orbit => Vec3::new(
            g.horizontal_radius * phase.cos(),
            g.vertical_offset,
            g.horizontal_radius * phase.sin(),
        ),
        ShotStyle::Dolly => {
            let r = g.base_radius + g.amplitude * phase.sin();
            let x = (r * g.elevation.cos()).max(MIN_HORIZONTAL_RADIUS);
            Vec3::new(x, g.vertical_offset, 0.0)
        }
        ShotStyle::Truck => Vec3::new(
            g.horizontal_radius + g.amplitude * 0.6 * phase.sin(),
            g.vertical_offset,
            0.0,
        ),
        ShotStyle::Crane => Vec3::new(
            g.horizontal_radius,
            g.vertical_offset + g.amplitude * 0.6 * phase.sin(),
            0.0,
        ),
    }
}

/// Solve the camera pose at simulation time `t` (seconds).
pub fn solve_pose(t: f32, params: &ShotParameters, focus: &FocusVolume) -> CameraPose {
    let g = ShotGeometry::derive(params, focus);
    let phase = t * params.speed();
    let anchor = Vec3::new(focus.center.x, g.target_y, focus.center.z);
    CameraPose {
        position: anchor + motion_offset(params.style(), phase, &g),
        target: anchor,
    }
}
