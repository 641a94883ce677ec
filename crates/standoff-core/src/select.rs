//! Pick the one detection to act on when a frame holds several.

use serde::{Deserialize, Serialize};

use crate::detection::{Detection, Frame};

/// Fiducial ids that win over everything else when visible: the speaker
/// tag as seen from either alliance side.
pub const DEFAULT_PRIORITY_IDS: [i32; 2] = [4, 7];

/// Result of selecting a target for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetSelection {
    Present(Detection),
    Absent,
}

impl TargetSelection {
    pub fn is_present(&self) -> bool {
        matches!(self, TargetSelection::Present(_))
    }

    pub fn detection(&self) -> Option<&Detection> {
        match self {
            TargetSelection::Present(d) => Some(d),
            TargetSelection::Absent => None,
        }
    }
}

impl From<Option<Detection>> for TargetSelection {
    fn from(d: Option<Detection>) -> Self {
        d.map_or(TargetSelection::Absent, TargetSelection::Present)
    }
}

/// Selector configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorParams {
    /// Ids preferred when several tags are visible. Membership only; the
    /// order of this list does not matter.
    pub priority_ids: Vec<i32>,
}

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            priority_ids: DEFAULT_PRIORITY_IDS.to_vec(),
        }
    }
}

/// Stateless target selector.
#[derive(Clone, Debug, Default)]
pub struct TargetSelector {
    params: SelectorParams,
}

impl TargetSelector {
    pub fn new(params: SelectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SelectorParams {
        &self.params
    }

    /// Choose a detection.
    ///
    /// - no detections: `Absent`;
    /// - exactly one: that one, whatever its id or ambiguity;
    /// - several: the first (in input order) whose id is a priority id,
    ///   otherwise `best`. Without a `best`, the lowest-ambiguity detection
    ///   is used, earliest on ties.
    pub fn select(&self, targets: &[Detection], best: Option<&Detection>) -> TargetSelection {
        match targets {
            [] => TargetSelection::Absent,
            [only] => TargetSelection::Present(*only),
            _ => {
                if let Some(hit) = targets
                    .iter()
                    .find(|d| self.params.priority_ids.contains(&d.id))
                {
                    return TargetSelection::Present(*hit);
                }
                best.copied()
                    .or_else(|| lowest_ambiguity(targets))
                    .into()
            }
        }
    }

    pub fn select_frame(&self, frame: &Frame) -> TargetSelection {
        self.select(&frame.targets, frame.best.as_ref())
    }
}

/// Select from a frame with the default priority ids.
pub fn select(frame: &Frame) -> TargetSelection {
    TargetSelector::default().select_frame(frame)
}

fn lowest_ambiguity(targets: &[Detection]) -> Option<Detection> {
    targets
        .iter()
        .fold(None::<&Detection>, |acc, d| match acc {
            Some(a) if a.ambiguity <= d.ambiguity => Some(a),
            _ => Some(d),
        })
        .copied()
}
