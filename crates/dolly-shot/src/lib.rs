// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Camera choreography for the Dolly previewer.
//!
//! - [`params`]: user-facing shot parameters and their constant tables.
//! - [`pose`]: the pure pose solver shared by the omniscient and in-shot views.
//! - [`focus`]: focus volume derived from the loaded scene graph.
//! - [`clock`]: frame-driven simulation clock.
//!
//! Nothing here performs I/O; the clock is the only stateful piece and it is
//! advanced explicitly by the caller's frame loop.

pub mod clock;
pub mod focus;
pub mod params;
pub mod pose;

pub use clock::{FrameTicker, ShotClock};
pub use focus::{world_bounds, FocusTracker, FocusVolume};
pub use params::{AngleClass, DistanceClass, ParseShotError, ShotParameters, ShotStyle};
pub use pose::{solve_pose, CameraPose, ShotGeometry};
