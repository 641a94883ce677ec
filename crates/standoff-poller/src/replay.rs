//! Replay recorded or hand-written frame sequences through a poller.
//!
//! A scenario is a JSON file holding poller params and one frame per tick.
//! Replaying it runs a single alignment exactly as the robot would and
//! records every tick, which makes field logs reproducible on a laptop.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use standoff_core::{Frame, StandoffPose};

use crate::{
    AlignmentPoller, ConfigIoError, PollPhase, PollerError, PollerParams, SensorArbiter,
    TickOutcome,
};

/// Input for [`replay`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: PollerParams,
    /// One frame per tick, in order.
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl ReplayScenario {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// One replayed tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Zero-based tick index.
    pub tick: usize,
    /// Number of detections in the frame.
    pub targets: usize,
    /// Id of the detection that resolved on this tick. `None` for misses,
    /// including a selected detection the resolver rejected.
    #[serde(default)]
    pub selected_id: Option<i32>,
    pub outcome: TickOutcome,
}

/// Result of a replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    #[serde(default)]
    pub name: Option<String>,
    pub ticks: Vec<TickRecord>,
    /// The emitted pose, if the run succeeded.
    #[serde(default)]
    pub pose: Option<StandoffPose>,
    /// Phase after the replay. A run still polling when the frames ran out
    /// is cancelled and reported as `cancelled`.
    pub phase: PollPhase,
    /// Missed cycles at the end of the run.
    pub cycles: u32,
    /// True when the frames ran out before the run ended.
    pub frames_exhausted: bool,
}

impl ReplayReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Run one alignment over the scenario's frames.
///
/// Stops at the first terminal outcome; remaining frames are not consumed.
pub fn replay(scenario: &ReplayScenario) -> Result<ReplayReport, PollerError> {
    let arbiter = SensorArbiter::new();
    let name = scenario.name.as_deref().unwrap_or("replay");
    let mut poller = AlignmentPoller::from_params(name, &scenario.params, arbiter);

    poller.start()?;

    let mut emitted: Option<StandoffPose> = None;
    let mut ticks = Vec::with_capacity(scenario.frames.len());
    let mut sink = |pose: StandoffPose| emitted = Some(pose);

    for (tick, frame) in scenario.frames.iter().enumerate() {
        let outcome = poller.tick_into(frame, &mut sink);
        ticks.push(TickRecord {
            tick,
            targets: frame.targets.len(),
            selected_id: poller.last_target(),
            outcome,
        });
        if outcome.is_terminal() {
            break;
        }
    }

    let frames_exhausted = poller.phase() == PollPhase::Polling;
    if frames_exhausted {
        poller.cancel();
    }

    Ok(ReplayReport {
        name: scenario.name.clone(),
        ticks,
        pose: emitted,
        phase: poller.phase(),
        cycles: poller.cycles(),
        frames_exhausted,
    })
}
