//! Core types and geometry for fiducial standoff targeting.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! talk to a camera or drive any hardware: callers hand in the detections a
//! vision pipeline produced for one frame and get back either the detection
//! to act on ([`TargetSelector`]) or the planar pose the robot should drive
//! to ([`PoseResolver`]).

mod detection;
mod geometry;
mod limit;
mod logger;
mod resolve;
mod select;

pub use detection::{Detection, Frame};
pub use geometry::{polar, rotation_deg, translation_angle, StandoffPose};
pub use limit::{RangeLimit, RangeLimiter};
pub use resolve::{
    PoseResolver, ResolveError, StandoffGeometry, StandoffSolution, DEFAULT_STANDOFF_RADIUS,
};
pub use select::{select, SelectorParams, TargetSelection, TargetSelector, DEFAULT_PRIORITY_IDS};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
