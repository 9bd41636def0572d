// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera state types for render targets.

use glam::Vec3;
use std::fmt;

/// Perspective camera handed to a target every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Camera position in world space.
    pub position: Vec3,
    /// Look-at target in world space.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y_radians: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 2.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_radians: 50f32.to_radians(),
            near: 0.05,
            far: 200.0,
        }
    }
}

/// Orbit radius for the target's interactive controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitRadius {
    /// Let the target frame the asset.
    Auto,
    /// Fixed distance in scene units.
    Fixed(f32),
}

/// Orbit pivot for the target's interactive controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitTarget {
    /// Pivot on the asset's bounds center.
    Auto,
    /// Pivot on an explicit world point.
    Point(Vec3),
}

/// Initial camera-orbit configuration sent with every assignment.
///
/// Angles follow the usual turntable convention: `theta` around the vertical
/// axis, `phi` measured down from the zenith.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitConfig {
    /// Azimuth in degrees.
    pub theta_deg: f32,
    /// Polar angle in degrees.
    pub phi_deg: f32,
    /// Orbit distance.
    pub radius: OrbitRadius,
    /// Orbit pivot.
    pub target: OrbitTarget,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            theta_deg: 0.0,
            phi_deg: 75.0,
            radius: OrbitRadius::Auto,
            target: OrbitTarget::Auto,
        }
    }
}

impl fmt::Display for OrbitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg {}deg ", self.theta_deg, self.phi_deg)?;
        match self.radius {
            OrbitRadius::Auto => f.write_str("auto")?,
            OrbitRadius::Fixed(r) => write!(f, "{r}m")?,
        }
        match self.target {
            OrbitTarget::Auto => f.write_str(" / auto auto auto"),
            OrbitTarget::Point(p) => write!(f, " / {}m {}m {}m", p.x, p.y, p.z),
        }
    }
}
