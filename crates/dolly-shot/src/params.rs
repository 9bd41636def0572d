// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shot parameters and the tables mapping each class to its numeric constant.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

/// Inclusive field-of-view range in degrees.
pub const FOV_RANGE_DEG: (f32, f32) = (20.0, 85.0);
/// Inclusive speed multiplier range.
pub const SPEED_RANGE: (f32, f32) = (0.2, 2.5);

/// Error returned by strict parsing of shot names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseShotError {
    /// Unknown camera motion name.
    #[error("unknown shot style `{0}` (expected STATIC, ORBIT, DOLLY, TRUCK or CRANE)")]
    Style(String),
    /// Unknown distance class.
    #[error("unknown distance `{0}` (expected CLOSE, MEDIUM or WIDE)")]
    Distance(String),
    /// Unknown angle class.
    #[error("unknown angle `{0}` (expected BIRD, HIGH, LEVEL or LOW)")]
    Angle(String),
}

/// Camera motion pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShotStyle {
    /// Fixed camera.
    #[default]
    Static,
    /// Circle around the subject.
    Orbit,
    /// Push in / pull out along the view axis.
    Dolly,
    /// Lateral sway.
    Truck,
    /// Vertical sway.
    Crane,
}

impl ShotStyle {
    /// Every style, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Static,
        Self::Orbit,
        Self::Dolly,
        Self::Truck,
        Self::Crane,
    ];

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Static => "STATIC",
            Self::Orbit => "ORBIT",
            Self::Dolly => "DOLLY",
            Self::Truck => "TRUCK",
            Self::Crane => "CRANE",
        }
    }

    /// Parse a stored or user-supplied name; unknown names become [`ShotStyle::Static`].
    pub fn from_name_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: ParseShotError| {
            debug!(%err, "falling back to STATIC");
            Self::Static
        })
    }
}

/// Shot distance class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DistanceClass {
    /// Close-up.
    Close,
    /// Medium shot.
    #[default]
    Medium,
    /// Wide shot.
    Wide,
}

impl DistanceClass {
    /// Every distance class, in menu order.
    pub const ALL: [Self; 3] = [Self::Close, Self::Medium, Self::Wide];

    /// Multiplier applied to the subject-relative base distance.
    pub const fn scale(self) -> f32 {
        match self {
            Self::Close => 1.4,
            Self::Medium => 2.5,
            Self::Wide => 4.5,
        }
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Close => "CLOSE",
            Self::Medium => "MEDIUM",
            Self::Wide => "WIDE",
        }
    }
}

/// Camera elevation class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AngleClass {
    /// Bird's-eye.
    Bird,
    /// High angle.
    High,
    /// Eye level.
    #[default]
    Level,
    /// Low angle.
    Low,
}

impl AngleClass {
    /// Every angle class, in menu order.
    pub const ALL: [Self; 4] = [Self::Bird, Self::High, Self::Level, Self::Low];

    /// Elevation above the horizon in degrees.
    pub const fn degrees(self) -> f32 {
        match self {
            Self::Bird => 60.0,
            Self::High => 30.0,
            Self::Level => 0.0,
            Self::Low => -20.0,
        }
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bird => "BIRD",
            Self::High => "HIGH",
            Self::Level => "LEVEL",
            Self::Low => "LOW",
        }
    }
}

fn normalized(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace(['-', '_'], "")
}

impl FromStr for ShotStyle {
    type Err = ParseShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "STATIC" => Ok(Self::Static),
            "ORBIT" | "ARC" => Ok(Self::Orbit),
            "DOLLY" => Ok(Self::Dolly),
            "TRUCK" => Ok(Self::Truck),
            "CRANE" => Ok(Self::Crane),
            _ => Err(ParseShotError::Style(s.to_string())),
        }
    }
}

impl FromStr for DistanceClass {
    type Err = ParseShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "CLOSE" | "CLOSESHOT" => Ok(Self::Close),
            "MEDIUM" => Ok(Self::Medium),
            "WIDE" | "WIDER" | "WIDERSHOT" => Ok(Self::Wide),
            _ => Err(ParseShotError::Distance(s.to_string())),
        }
    }
}

impl FromStr for AngleClass {
    type Err = ParseShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "BIRD" => Ok(Self::Bird),
            "HIGH" => Ok(Self::High),
            "LEVEL" => Ok(Self::Level),
            "LOW" => Ok(Self::Low),
            _ => Err(ParseShotError::Angle(s.to_string())),
        }
    }
}

impl fmt::Display for ShotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for DistanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for AngleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn clamp_or(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

/// User-selected shot. Setters clamp into the documented ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotParameters {
    style: ShotStyle,
    distance: DistanceClass,
    angle: AngleClass,
    fov_deg: f32,
    speed: f32,
}

impl Default for ShotParameters {
    fn default() -> Self {
        Self {
            style: ShotStyle::Orbit,
            distance: DistanceClass::Medium,
            angle: AngleClass::Level,
            fov_deg: 50.0,
            speed: 0.8,
        }
    }
}

impl ShotParameters {
    /// Build parameters, clamping `fov_deg` and `speed`.
    pub fn new(
        style: ShotStyle,
        distance: DistanceClass,
        angle: AngleClass,
        fov_deg: f32,
        speed: f32,
    ) -> Self {
        Self::default()
            .with_style(style)
            .with_distance(distance)
            .with_angle(angle)
            .with_fov_deg(fov_deg)
            .with_speed(speed)
    }

    /// Replace the motion style.
    pub fn with_style(mut self, style: ShotStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the distance class.
    pub fn with_distance(mut self, distance: DistanceClass) -> Self {
        self.distance = distance;
        self
    }

    /// Replace the angle class.
    pub fn with_angle(mut self, angle: AngleClass) -> Self {
        self.angle = angle;
        self
    }

    /// Replace the field of view; clamped to [`FOV_RANGE_DEG`], non-finite input is ignored.
    pub fn with_fov_deg(mut self, fov_deg: f32) -> Self {
        self.fov_deg = clamp_or(fov_deg, FOV_RANGE_DEG, self.fov_deg);
        self
    }

    /// Replace the speed multiplier; clamped to [`SPEED_RANGE`], non-finite input is ignored.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = clamp_or(speed, SPEED_RANGE, self.speed);
        self
    }

    /// Motion style.
    pub fn style(&self) -> ShotStyle {
        self.style
    }

    /// Distance class.
    pub fn distance(&self) -> DistanceClass {
        self.distance
    }

    /// Angle class.
    pub fn angle(&self) -> AngleClass {
        self.angle
    }

    /// Field of view in degrees.
    pub fn fov_deg(&self) -> f32 {
        self.fov_deg
    }

    /// Speed multiplier.
    pub fn speed(&self) -> f32 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_total() {
        let scales: Vec<f32> = DistanceClass::ALL.iter().map(|d| d.scale()).collect();
        assert_eq!(scales, vec![1.4, 2.5, 4.5]);
        let degs: Vec<f32> = AngleClass::ALL.iter().map(|a| a.degrees()).collect();
        assert_eq!(degs, vec![60.0, 30.0, 0.0, -20.0]);
    }

    #[test]
    fn names_round_trip() {
        for s in ShotStyle::ALL {
            assert_eq!(s.name().parse::<ShotStyle>(), Ok(s));
        }
        for d in DistanceClass::ALL {
            assert_eq!(d.name().parse::<DistanceClass>(), Ok(d));
        }
        for a in AngleClass::ALL {
            assert_eq!(a.name().parse::<AngleClass>(), Ok(a));
        }
    }

    #[test]
    fn ui_labels_parse() {
        assert_eq!("wider-shot".parse::<DistanceClass>(), Ok(DistanceClass::Wide));
        assert_eq!("close_shot".parse::<DistanceClass>(), Ok(DistanceClass::Close));
        assert_eq!(" orbit ".parse::<ShotStyle>(), Ok(ShotStyle::Orbit));
    }

    #[test]
    fn unknown_style_is_strict_error_and_lenient_static() {
        assert_eq!(
            "ZOOM".parse::<ShotStyle>(),
            Err(ParseShotError::Style("ZOOM".into()))
        );
        assert_eq!(ShotStyle::from_name_lenient("ZOOM"), ShotStyle::Static);
    }

    #[test]
    fn setters_clamp_ranges() {
        let p = ShotParameters::default()
            .with_fov_deg(120.0)
            .with_speed(0.0);
        assert_eq!(p.fov_deg(), 85.0);
        assert_eq!(p.speed(), 0.2);
        let q = p.with_fov_deg(f32::NAN).with_speed(f32::INFINITY);
        assert_eq!(q.fov_deg(), 85.0);
        assert_eq!(q.speed(), 0.2);
    }

    #[test]
    fn defaults_match_the_preview_ui() {
        let p = ShotParameters::default();
        assert_eq!(p.style(), ShotStyle::Orbit);
        assert_eq!(p.distance(), DistanceClass::Medium);
        assert_eq!(p.angle(), AngleClass::Level);
        assert_eq!(p.fov_deg(), 50.0);
        assert_eq!(p.speed(), 0.8);
    }
}
