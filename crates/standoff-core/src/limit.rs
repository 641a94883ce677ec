//! Range limiting for the target facing angle.
//!
//! The mechanism (or the camera's field of view) only supports a window of
//! approach angles. The resolver asks a [`RangeLimiter`] to map the raw
//! facing angle into that window and steers the standoff point by the
//! difference.

use nalgebra::UnitComplex;
use serde::{Deserialize, Serialize};

use crate::resolve::ResolveError;

/// Maps a rotation to the nearest rotation inside an allowed range.
///
/// Implementations must return the input unchanged when it is already in
/// range.
pub trait RangeLimiter {
    fn limit(&self, angle: UnitComplex<f64>) -> UnitComplex<f64>;

    /// Reject a range that cannot be applied. Checked once before a run
    /// starts; closures are always accepted.
    fn validate(&self) -> Result<(), ResolveError> {
        Ok(())
    }
}

impl<F> RangeLimiter for F
where
    F: Fn(UnitComplex<f64>) -> UnitComplex<f64>,
{
    fn limit(&self, angle: UnitComplex<f64>) -> UnitComplex<f64> {
        self(angle)
    }
}

/// Serializable range policy for configs and replay files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeLimit {
    /// Every angle is allowed.
    #[default]
    Unlimited,
    /// `[-max_deg, max_deg]`.
    Symmetric { max_deg: f64 },
    /// `[min_deg, max_deg]`, both in `[-180, 180]`. With `min_deg > max_deg`
    /// the window wraps through ±180°.
    Window { min_deg: f64, max_deg: f64 },
}

impl RangeLimit {
    fn bounds_deg(&self) -> Option<(f64, f64)> {
        match *self {
            RangeLimit::Unlimited => None,
            RangeLimit::Symmetric { max_deg } => Some((-max_deg.abs(), max_deg.abs())),
            RangeLimit::Window { min_deg, max_deg } => Some((min_deg, max_deg)),
        }
    }
}

impl RangeLimiter for RangeLimit {
    fn limit(&self, angle: UnitComplex<f64>) -> UnitComplex<f64> {
        let Some((min_deg, max_deg)) = self.bounds_deg() else {
            return angle;
        };
        let deg = angle.angle().to_degrees();
        let in_range = if min_deg <= max_deg {
            (min_deg..=max_deg).contains(&deg)
        } else {
            deg >= min_deg || deg <= max_deg
        };
        if in_range {
            return angle;
        }
        // Snap to whichever bound is angularly closer.
        let to_min = angular_distance_deg(deg, min_deg);
        let to_max = angular_distance_deg(deg, max_deg);
        let bound = if to_min <= to_max { min_deg } else { max_deg };
        UnitComplex::new(bound.to_radians())
    }

    fn validate(&self) -> Result<(), ResolveError> {
        let Some((min_deg, max_deg)) = self.bounds_deg() else {
            return Ok(());
        };
        let finite = min_deg.is_finite() && max_deg.is_finite();
        let window_ok = match self {
            RangeLimit::Window { .. } => (-180.0..=180.0).contains(&min_deg)
                && (-180.0..=180.0).contains(&max_deg),
            _ => true,
        };
        if finite && window_ok {
            Ok(())
        } else {
            Err(ResolveError::InvalidRange { min_deg, max_deg })
        }
    }
}

fn angular_distance_deg(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn deg(d: f64) -> UnitComplex<f64> {
        UnitComplex::new(d.to_radians())
    }

    #[test]
    fn unlimited_is_identity() {
        let a = deg(123.0);
        assert_eq!(RangeLimit::Unlimited.limit(a), a);
    }

    #[test]
    fn in_range_angle_is_unchanged() {
        let a = deg(20.0);
        assert_eq!(RangeLimit::Symmetric { max_deg: 30.0 }.limit(a), a);
    }

    #[test]
    fn symmetric_clamps_both_sides() {
        let lim = RangeLimit::Symmetric { max_deg: 30.0 };
        assert_abs_diff_eq!(lim.limit(deg(50.0)).angle().to_degrees(), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lim.limit(deg(-50.0)).angle().to_degrees(), -30.0, epsilon = 1e-9);
    }

    #[test]
    fn window_snaps_across_wraparound() {
        let lim = RangeLimit::Window {
            min_deg: -10.0,
            max_deg: 60.0,
        };
        // 170° is 110° from 60° and 180° from -10°.
        assert_abs_diff_eq!(lim.limit(deg(170.0)).angle().to_degrees(), 60.0, epsilon = 1e-9);
        // -100° is 90° from -10° and 160° from 60°.
        assert_abs_diff_eq!(lim.limit(deg(-100.0)).angle().to_degrees(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn inverted_window_wraps_through_180() {
        let lim = RangeLimit::Window {
            min_deg: 150.0,
            max_deg: -150.0,
        };
        let back = deg(180.0);
        assert_eq!(lim.limit(back), back);
        let a = deg(-170.0);
        assert_eq!(lim.limit(a), a);
        // 10° is 140° from 150° and 160° from -150°.
        assert_abs_diff_eq!(lim.limit(deg(10.0)).angle().to_degrees(), 150.0, epsilon = 1e-9);
        // -60° is 90° from -150° and 150° from 150°.
        assert_abs_diff_eq!(lim.limit(deg(-60.0)).angle().to_degrees(), -150.0, epsilon = 1e-9);
    }

    #[test]
    fn narrow_wrapped_window_excludes_forward() {
        // [10°, 180°] and [-180°, -10°]: straight ahead is out of range.
        let lim = RangeLimit::Window {
            min_deg: 10.0,
            max_deg: -10.0,
        };
        assert_abs_diff_eq!(lim.limit(deg(3.0)).angle().to_degrees(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lim.limit(deg(-3.0)).angle().to_degrees(), -10.0, epsilon = 1e-9);
        assert_eq!(lim.limit(deg(90.0)), deg(90.0));
    }

    #[test]
    fn validate_rejects_unusable_bounds() {
        assert!(RangeLimit::Unlimited.validate().is_ok());
        assert!(RangeLimit::Symmetric { max_deg: 400.0 }.validate().is_ok());
        assert!(RangeLimit::Window {
            min_deg: 150.0,
            max_deg: -150.0
        }
        .validate()
        .is_ok());

        assert!(matches!(
            RangeLimit::Symmetric { max_deg: f64::NAN }.validate(),
            Err(ResolveError::InvalidRange { .. })
        ));
        assert_eq!(
            RangeLimit::Window {
                min_deg: -10.0,
                max_deg: 270.0
            }
            .validate(),
            Err(ResolveError::InvalidRange {
                min_deg: -10.0,
                max_deg: 270.0
            })
        );
    }

    #[test]
    fn closures_are_limiters() {
        let zero = |_: UnitComplex<f64>| UnitComplex::identity();
        assert_eq!(zero.limit(deg(45.0)).angle(), 0.0);
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn parses_tagged_json() {
        let lim: RangeLimit = serde_json::from_str(r#"{"kind":"symmetric","max_deg":25.0}"#).unwrap();
        assert_eq!(lim, RangeLimit::Symmetric { max_deg: 25.0 });
    }
}
