//! Alignment poller.
//!
//! This crate wires the target selector and pose resolver from
//! `standoff-core` into a tick-driven state machine:
//!
//! - every tick selects a detection from the latest camera frame;
//! - the first usable detection is resolved and emitted exactly once;
//! - more than `max_missed_cycles` empty ticks in a row time the run out;
//! - the camera is leased for the whole run so two commands never drive it
//!   at the same time.
//!
//! Timeouts are counted in ticks, not wall time: at a 20 ms control loop the
//! default of 10 missed cycles gives up on the 11th empty tick, i.e. after
//! roughly 220 ms.

mod error;
mod lease;
mod params;
mod poller;
mod replay;
mod sink;
mod state;

pub use error::{ConfigIoError, PollerError};
pub use lease::{SensorArbiter, SensorLease};
pub use params::{PollerParams, DEFAULT_MAX_MISSED_CYCLES};
pub use poller::AlignmentPoller;
pub use replay::{replay, ReplayReport, ReplayScenario, TickRecord};
pub use sink::{ChannelSink, PoseSink};
pub use state::{transition, PollPhase, PollState, TickInput, TickOutcome};
