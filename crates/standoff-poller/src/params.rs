//! Poller configuration and JSON helpers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use standoff_core::{
    PoseResolver, RangeLimit, SelectorParams, StandoffGeometry, TargetSelector,
};

use crate::{ConfigIoError, PollerError};

/// Empty ticks tolerated before a run gives up (it times out on the next).
pub const DEFAULT_MAX_MISSED_CYCLES: u32 = 10;

fn default_max_missed_cycles() -> u32 {
    DEFAULT_MAX_MISSED_CYCLES
}

/// Everything needed to build an [`AlignmentPoller`](crate::AlignmentPoller).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollerParams {
    #[serde(default = "default_max_missed_cycles")]
    pub max_missed_cycles: u32,
    #[serde(default)]
    pub selector: SelectorParams,
    #[serde(default)]
    pub geometry: StandoffGeometry,
    #[serde(default)]
    pub range_limit: RangeLimit,
}

impl Default for PollerParams {
    fn default() -> Self {
        Self {
            max_missed_cycles: DEFAULT_MAX_MISSED_CYCLES,
            selector: SelectorParams::default(),
            geometry: StandoffGeometry::default(),
            range_limit: RangeLimit::default(),
        }
    }
}

impl PollerParams {
    /// Load params from a JSON file. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write params to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject params that would make every tick a miss: a negative or
    /// non-finite standoff radius, or an unusable facing range.
    pub fn validate(&self) -> Result<(), PollerError> {
        self.build_resolver().validate()?;
        Ok(())
    }

    pub fn build_selector(&self) -> TargetSelector {
        TargetSelector::new(self.selector.clone())
    }

    pub fn build_resolver(&self) -> PoseResolver<RangeLimit> {
        PoseResolver::new(self.geometry, self.range_limit)
    }
}
