//! High-level facade crate for the `standoff-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the member crates;
//! - (feature `cli`) the `standoff` binary, which replays frame sequences
//!   through the alignment poller.
//!
//! ## Quickstart
//!
//! ```
//! use standoff::core::{Detection, Frame, StandoffPose};
//! use standoff::poller::{AlignmentPoller, PollerParams, SensorArbiter, TickOutcome};
//! use nalgebra::Vector3;
//!
//! let camera = SensorArbiter::new();
//! let mut align = AlignmentPoller::from_params("align", &PollerParams::default(), camera);
//! align.start().unwrap();
//!
//! let frame = Frame::from_targets(vec![Detection::new(7, 0.05, Vector3::new(3.0, 0.0, 0.0), 0.0)]);
//! let mut drive_to = |pose: StandoffPose| println!("drive to {pose}");
//! let outcome = align.tick_into(&frame, &mut drive_to);
//! assert!(matches!(outcome, TickOutcome::Succeeded(_)));
//! assert!(align.is_finished());
//! ```
//!
//! ## API map
//! - `standoff::core`: detections, target selection, range limiting, pose resolution.
//! - `standoff::poller`: the tick-driven poller, sensor lease, params and replay.

pub use standoff_core as core;
pub use standoff_poller as poller;

pub use standoff_core::{
    Detection, Frame, PoseResolver, RangeLimit, RangeLimiter, StandoffPose, TargetSelection,
    TargetSelector,
};
pub use standoff_poller::{
    replay, AlignmentPoller, PollPhase, PollerParams, ReplayReport, ReplayScenario,
    SensorArbiter, TickOutcome,
};

#[cfg(feature = "tracing")]
pub use standoff_core::init_tracing;

pub use standoff_core::init_with_level;
