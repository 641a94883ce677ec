//! Poll state machine.
//!
//! `Idle -> Polling -> {Succeeded, TimedOut, Cancelled}`. The transition
//! function is pure so it can be tested without a scheduler or a camera.

use std::fmt;

use serde::{Deserialize, Serialize};
use standoff_core::StandoffPose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    Idle,
    Polling,
    Succeeded,
    TimedOut,
    Cancelled,
}

impl PollPhase {
    /// No further tick can change a terminal phase; only `start` leaves it.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PollPhase::Succeeded | PollPhase::TimedOut | PollPhase::Cancelled
        )
    }
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PollPhase::Idle => "idle",
            PollPhase::Polling => "polling",
            PollPhase::Succeeded => "succeeded",
            PollPhase::TimedOut => "timed_out",
            PollPhase::Cancelled => "cancelled",
        })
    }
}

/// Mutable state of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    pub phase: PollPhase,
    /// Consecutive ticks without a usable detection.
    pub cycles: u32,
    pub pose_computed: bool,
    pub running: bool,
}

impl Default for PollState {
    fn default() -> Self {
        Self::IDLE
    }
}

impl PollState {
    pub const IDLE: PollState = PollState {
        phase: PollPhase::Idle,
        cycles: 0,
        pose_computed: false,
        running: false,
    };

    /// Fresh state at the start of a run.
    pub fn started() -> Self {
        PollState {
            phase: PollPhase::Polling,
            cycles: 0,
            pose_computed: false,
            running: true,
        }
    }

    /// State after an external cancel. A computed pose stays computed.
    pub fn cancelled(self) -> Self {
        if self.phase.is_terminal() {
            return self;
        }
        PollState {
            phase: PollPhase::Cancelled,
            running: false,
            ..self
        }
    }

    /// True when a tick would do work.
    pub fn accepts_ticks(&self) -> bool {
        self.phase == PollPhase::Polling && !self.pose_computed
    }
}

/// What one tick observed, after selection and resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickInput {
    /// Detection `id` resolved to `pose`.
    Found { id: i32, pose: StandoffPose },
    /// Nothing selected, or the selected detection was rejected.
    Missing,
}

impl TickInput {
    /// Id of the detection that resolved this tick.
    pub fn target_id(&self) -> Option<i32> {
        match self {
            TickInput::Found { id, .. } => Some(*id),
            TickInput::Missing => None,
        }
    }
}

/// Result of a tick as seen by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Still waiting for a detection.
    Pending { cycles: u32 },
    /// The pose for this run. Returned once.
    Succeeded(StandoffPose),
    /// Gave up after too many empty ticks.
    TimedOut { cycles: u32 },
    /// The poller was not polling; nothing happened.
    Inactive,
}

impl TickOutcome {
    pub fn pose(&self) -> Option<StandoffPose> {
        match self {
            TickOutcome::Succeeded(pose) => Some(*pose),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Succeeded(_) | TickOutcome::TimedOut { .. })
    }
}

/// Advance `state` by one tick.
///
/// A run times out on the tick where the miss counter first exceeds
/// `max_missed_cycles`.
pub fn transition(
    state: PollState,
    input: TickInput,
    max_missed_cycles: u32,
) -> (PollState, TickOutcome) {
    if !state.accepts_ticks() {
        return (state, TickOutcome::Inactive);
    }

    match input {
        TickInput::Found { pose, .. } => (
            PollState {
                phase: PollPhase::Succeeded,
                pose_computed: true,
                running: false,
                ..state
            },
            TickOutcome::Succeeded(pose),
        ),
        TickInput::Missing => {
            let cycles = state.cycles.saturating_add(1);
            if cycles > max_missed_cycles {
                (
                    PollState {
                        phase: PollPhase::TimedOut,
                        cycles,
                        running: false,
                        ..state
                    },
                    TickOutcome::TimedOut { cycles },
                )
            } else {
                (PollState { cycles, ..state }, TickOutcome::Pending { cycles })
            }
        }
    }
}
