//! Standoff pose derivation from a single detection.
//!
//! The robot should stop a fixed radius short of the tag, on the ray from
//! the camera to the tag. When the tag is seen at an angle the mechanism
//! cannot face, the ray is swung by the out-of-range part of that angle so
//! the robot approaches from an allowed direction.

use nalgebra::{UnitComplex, Vector2};
use serde::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::geometry::{polar, rotation_deg, translation_angle, StandoffPose};
use crate::limit::{RangeLimit, RangeLimiter};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// `0.5 + 1.0 + 0.75` metres, see [`StandoffGeometry::default`].
pub const DEFAULT_STANDOFF_RADIUS: f64 = 2.25;

/// Physical offsets that add up to the standoff radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandoffGeometry {
    /// Distance from the camera mount to the robot's front bumper.
    pub camera_to_robot_front: f64,
    /// Desired gap between the bumper and the tag.
    pub marker_gap: f64,
    /// Extra clearance on top of `marker_gap`.
    pub safety_margin: f64,
}

impl Default for StandoffGeometry {
    fn default() -> Self {
        Self {
            camera_to_robot_front: 0.5,
            marker_gap: 1.0,
            safety_margin: 0.75,
        }
    }
}

impl StandoffGeometry {
    #[inline]
    pub fn radius(&self) -> f64 {
        self.camera_to_robot_front + self.marker_gap + self.safety_margin
    }

    /// The radius must be finite and non-negative. Individual offsets may be
    /// negative as long as their sum is not.
    pub fn validate(&self) -> Result<(), ResolveError> {
        let radius = self.radius();
        if radius.is_finite() && radius >= 0.0 {
            Ok(())
        } else {
            Err(ResolveError::InvalidRadius { radius })
        }
    }
}

/// Errors returned by [`PoseResolver`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ResolveError {
    #[error("detection {id} has non-finite geometry")]
    NonFiniteGeometry { id: i32 },
    #[error("standoff radius must be finite and non-negative (got {radius})")]
    InvalidRadius { radius: f64 },
    #[error("facing range [{min_deg}°, {max_deg}°] is not usable")]
    InvalidRange { min_deg: f64, max_deg: f64 },
}

/// Resolver output including the intermediate angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandoffSolution {
    pub pose: StandoffPose,
    /// Facing angle derived from the detection yaw (sign flipped).
    pub facing: UnitComplex<f64>,
    /// `facing` after range limiting.
    pub clamped_facing: UnitComplex<f64>,
    /// Polar angle of the camera-to-target translation.
    pub translation_angle: UnitComplex<f64>,
    /// `facing - clamped_facing`; identity when in range.
    pub extra_angle: UnitComplex<f64>,
    /// Vector from the standoff point to the tag.
    pub gap: Vector2<f64>,
    /// Standoff translation expressed along the tag's facing direction
    /// (x = forward, y = lateral). Diagnostic only.
    pub forward_lateral: Vector2<f64>,
}

/// Turns a detection into the pose the robot should drive to.
#[derive(Clone, Debug, Default)]
pub struct PoseResolver<L = RangeLimit> {
    geometry: StandoffGeometry,
    limiter: L,
}

impl<L: RangeLimiter> PoseResolver<L> {
    pub fn new(geometry: StandoffGeometry, limiter: L) -> Self {
        Self { geometry, limiter }
    }

    #[inline]
    pub fn geometry(&self) -> &StandoffGeometry {
        &self.geometry
    }

    #[inline]
    pub fn limiter(&self) -> &L {
        &self.limiter
    }

    /// Check the geometry and the limiter once, before any detection is
    /// resolved.
    pub fn validate(&self) -> Result<(), ResolveError> {
        self.geometry.validate()?;
        self.limiter.validate()
    }

    /// Standoff pose for `detection`.
    pub fn resolve(&self, detection: &Detection) -> Result<StandoffPose, ResolveError> {
        self.resolve_detailed(detection).map(|s| s.pose)
    }

    /// Standoff pose plus every intermediate value.
    ///
    /// Pure: the result depends only on `detection`, the geometry and the
    /// limiter.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, detection), fields(id = detection.id))
    )]
    pub fn resolve_detailed(&self, detection: &Detection) -> Result<StandoffSolution, ResolveError> {
        self.geometry.validate()?;
        let radius = self.geometry.radius();
        if !detection.is_finite() {
            return Err(ResolveError::NonFiniteGeometry { id: detection.id });
        }

        let translation = detection.planar_translation();
        let facing = rotation_deg(-detection.yaw_deg);
        let ray = translation_angle(&translation);

        let clamped_facing = self.limiter.limit(facing);
        let extra_angle = facing * clamped_facing.inverse();

        let gap = polar(radius, ray * extra_angle.inverse());
        let standoff = translation - gap;
        let heading = ray * translation_angle(&gap);

        let pose = StandoffPose {
            translation: standoff,
            heading,
        };
        if !(pose.x().is_finite() && pose.y().is_finite() && pose.heading_rad().is_finite()) {
            return Err(ResolveError::NonFiniteGeometry { id: detection.id });
        }

        let forward_lateral = facing.inverse() * standoff;
        log::debug!(
            "tag {}: camera->tag ({:.3}, {:.3}), facing {:.2}°, extra {:.2}°, standoff {}, forward/lateral ({:.3}, {:.3})",
            detection.id,
            translation.x,
            translation.y,
            facing.angle().to_degrees(),
            extra_angle.angle().to_degrees(),
            pose,
            forward_lateral.x,
            forward_lateral.y
        );

        Ok(StandoffSolution {
            pose,
            facing,
            clamped_facing,
            translation_angle: ray,
            extra_angle,
            gap,
            forward_lateral,
        })
    }
}
