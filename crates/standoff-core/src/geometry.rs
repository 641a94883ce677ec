//! Planar geometry helpers shared by the resolver and the poller.
//!
//! Conventions: `x` points forward out of the camera, `y` points left, and
//! headings are counter-clockwise rotations with 0 = forward.

use std::fmt;

use nalgebra::{Isometry2, UnitComplex, Vector2};
use serde::{Deserialize, Serialize};

/// Translations shorter than this have no meaningful direction.
pub(crate) const DEGENERATE_NORM: f64 = 1e-9;

/// Polar angle of a planar translation.
///
/// A (near) zero-length translation has no direction; it is reported as the
/// identity rotation instead of whatever `atan2(±0, ±0)` happens to yield.
pub fn translation_angle(v: &Vector2<f64>) -> UnitComplex<f64> {
    if v.norm() < DEGENERATE_NORM {
        return UnitComplex::identity();
    }
    UnitComplex::new(v.y.atan2(v.x))
}

/// Vector of length `radius` pointing along `angle`.
#[inline]
pub fn polar(radius: f64, angle: UnitComplex<f64>) -> Vector2<f64> {
    angle * Vector2::new(radius, 0.0)
}

/// Rotation from an angle in degrees.
#[inline]
pub fn rotation_deg(deg: f64) -> UnitComplex<f64> {
    UnitComplex::new(deg.to_radians())
}

/// Desired robot pose relative to the camera, in the robot's planar frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoseRepr", into = "PoseRepr")]
pub struct StandoffPose {
    pub translation: Vector2<f64>,
    pub heading: UnitComplex<f64>,
}

impl StandoffPose {
    pub fn new(x: f64, y: f64, heading_rad: f64) -> Self {
        Self {
            translation: Vector2::new(x, y),
            heading: UnitComplex::new(heading_rad),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.translation.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.translation.y
    }

    /// Heading in radians, wrapped to `(-π, π]`.
    #[inline]
    pub fn heading_rad(&self) -> f64 {
        self.heading.angle()
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::from_parts(self.translation.into(), self.heading)
    }
}

impl fmt::Display for StandoffPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.3}, y: {:.3}, heading: {:.2}°)",
            self.x(),
            self.y(),
            self.heading_rad().to_degrees()
        )
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct PoseRepr {
    x: f64,
    y: f64,
    heading_rad: f64,
}

impl From<PoseRepr> for StandoffPose {
    fn from(r: PoseRepr) -> Self {
        StandoffPose::new(r.x, r.y, r.heading_rad)
    }
}

impl From<StandoffPose> for PoseRepr {
    fn from(p: StandoffPose) -> Self {
        PoseRepr {
            x: p.x(),
            y: p.y(),
            heading_rad: p.heading_rad(),
        }
    }
}
