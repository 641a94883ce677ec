use standoff_core::{
    Frame, PoseResolver, RangeLimit, RangeLimiter, TargetSelection, TargetSelector,
};

use crate::lease::{SensorArbiter, SensorLease};
use crate::params::PollerParams;
use crate::sink::PoseSink;
use crate::state::{transition, PollPhase, PollState, TickInput, TickOutcome};
use crate::PollerError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Polls camera frames until a standoff pose is found or the run times out.
///
/// The owning scheduler calls [`start`](Self::start) once, then
/// [`tick`](Self::tick) once per control-loop period with the latest frame.
/// Each tick is bounded work: one selection and at most one resolution.
pub struct AlignmentPoller<L = RangeLimit> {
    name: String,
    selector: TargetSelector,
    resolver: PoseResolver<L>,
    max_missed_cycles: u32,
    arbiter: SensorArbiter,
    lease: Option<SensorLease>,
    state: PollState,
    last_target: Option<i32>,
}

impl AlignmentPoller<RangeLimit> {
    /// Build a poller from serializable params.
    pub fn from_params(name: &str, params: &PollerParams, arbiter: SensorArbiter) -> Self {
        Self::new(
            name,
            params.build_selector(),
            params.build_resolver(),
            params.max_missed_cycles,
            arbiter,
        )
    }
}

impl<L: RangeLimiter> AlignmentPoller<L> {
    pub fn new(
        name: &str,
        selector: TargetSelector,
        resolver: PoseResolver<L>,
        max_missed_cycles: u32,
        arbiter: SensorArbiter,
    ) -> Self {
        Self {
            name: name.to_owned(),
            selector,
            resolver,
            max_missed_cycles,
            arbiter,
            lease: None,
            state: PollState::IDLE,
            last_target: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> PollState {
        self.state
    }

    #[inline]
    pub fn phase(&self) -> PollPhase {
        self.state.phase
    }

    #[inline]
    pub fn cycles(&self) -> u32 {
        self.state.cycles
    }

    /// True while polling; false before start and once a run ended.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// True once this run has produced its pose.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.pose_computed
    }

    /// Id of the detection that resolved on the most recent tick, if any.
    /// `None` when that tick selected nothing or its detection was rejected.
    #[inline]
    pub fn last_target(&self) -> Option<i32> {
        self.last_target
    }

    /// Whether this poller currently holds the sensor lease.
    pub fn holds_sensor(&self) -> bool {
        self.lease.is_some()
    }

    /// Begin a fresh run.
    ///
    /// Resets all run state and leases the sensor. Restarting a poller that
    /// is already polling hands its own lease back first.
    ///
    /// Fails with [`PollerError::InvalidParams`] when the geometry or the
    /// facing range can never yield a pose; the sensor is not leased then.
    pub fn start(&mut self) -> Result<(), PollerError> {
        self.lease = None;
        self.state = PollState::IDLE;
        self.last_target = None;
        self.resolver.validate()?;
        let lease = self.arbiter.try_acquire(&self.name)?;
        self.lease = Some(lease);
        self.state = PollState::started();
        log::info!("[{}] alignment started", self.name);
        Ok(())
    }

    /// Process one camera frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(poller = %self.name, targets = frame.targets.len()))
    )]
    pub fn tick(&mut self, frame: &Frame) -> TickOutcome {
        self.last_target = None;
        if !self.state.accepts_ticks() {
            return TickOutcome::Inactive;
        }

        let input = self.observe(frame);
        self.last_target = input.target_id();
        let (next, outcome) = transition(self.state, input, self.max_missed_cycles);
        self.state = next;

        match outcome {
            TickOutcome::Pending { cycles } => {
                log::debug!("[{}] cycle {cycles}: no target", self.name);
            }
            TickOutcome::Succeeded(pose) => {
                log::info!(
                    "[{}] standoff pose {pose} after {} missed cycles",
                    self.name,
                    self.state.cycles
                );
            }
            TickOutcome::TimedOut { cycles } => {
                log::warn!(
                    "[{}] no target for {cycles} cycles, giving up",
                    self.name
                );
            }
            TickOutcome::Inactive => {}
        }

        if self.state.phase.is_terminal() {
            self.lease = None;
        }
        outcome
    }

    /// [`tick`](Self::tick), handing a successful pose to `sink`.
    ///
    /// The sink is called at most once per run.
    pub fn tick_into<S: PoseSink + ?Sized>(&mut self, frame: &Frame, sink: &mut S) -> TickOutcome {
        let outcome = self.tick(frame);
        if let TickOutcome::Succeeded(pose) = outcome {
            sink.accept(pose);
        }
        outcome
    }

    /// Stop the run immediately. Releases the sensor; no pose is emitted
    /// afterwards. Has no effect on a run that already ended.
    pub fn cancel(&mut self) {
        if self.state.phase == PollPhase::Polling {
            log::info!(
                "[{}] alignment cancelled after {} missed cycles",
                self.name,
                self.state.cycles
            );
        }
        self.state = self.state.cancelled();
        self.lease = None;
    }

    fn observe(&self, frame: &Frame) -> TickInput {
        if frame.has_targets() {
            log::debug!(
                "[{}] frame: {} target(s) {:?}, best {:?}",
                self.name,
                frame.targets.len(),
                frame.targets.iter().map(|d| d.id).collect::<Vec<_>>(),
                frame.best.map(|d| d.id)
            );
        }

        let detection = match self.selector.select_frame(frame) {
            TargetSelection::Present(d) => d,
            TargetSelection::Absent => return TickInput::Missing,
        };

        match self.resolver.resolve(&detection) {
            Ok(pose) => TickInput::Found {
                id: detection.id,
                pose,
            },
            Err(err) => {
                log::warn!("[{}] rejecting detection: {err}", self.name);
                TickInput::Missing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use standoff_core::Detection;

    fn tag(id: i32, x: f64) -> Detection {
        Detection::new(id, 0.1, Vector3::new(x, 0.0, 0.0), 0.0)
    }

    fn poller(arbiter: &SensorArbiter) -> AlignmentPoller {
        AlignmentPoller::from_params("align", &PollerParams::default(), arbiter.clone())
    }

    #[test]
    fn idle_poller_ignores_frames() {
        let arbiter = SensorArbiter::new();
        let mut p = poller(&arbiter);
        assert_eq!(p.tick(&Frame::from_targets(vec![tag(7, 3.0)])), TickOutcome::Inactive);
        assert!(!p.is_running());
        assert!(!p.is_finished());
        assert!(!arbiter.is_held());
    }

    #[test]
    fn start_leases_sensor_and_success_releases_it() {
        let arbiter = SensorArbiter::new();
        let mut p = poller(&arbiter);
        p.start().unwrap();
        assert!(p.is_running());
        assert_eq!(arbiter.owner().as_deref(), Some("align"));

        let out = p.tick(&Frame::from_targets(vec![tag(7, 3.0)]));
        assert!(out.pose().is_some());
        assert!(p.is_finished());
        assert!(!p.is_running());
        assert!(!arbiter.is_held());
    }

    #[test]
    fn start_fails_when_sensor_is_taken() {
        let arbiter = SensorArbiter::new();
        let _other = arbiter.try_acquire("shooter").unwrap();
        let mut p = poller(&arbiter);
        assert_eq!(
            p.start(),
            Err(PollerError::SensorBusy {
                owner: "shooter".into()
            })
        );
        assert_eq!(p.phase(), PollPhase::Idle);
        assert!(!p.is_running());
    }

    #[test]
    fn restart_while_polling_keeps_lease() {
        let arbiter = SensorArbiter::new();
        let mut p = poller(&arbiter);
        p.start().unwrap();
        p.tick(&Frame::empty());
        assert_eq!(p.cycles(), 1);
        p.start().unwrap();
        assert_eq!(p.cycles(), 0);
        assert!(p.holds_sensor());
    }

    #[test]
    fn non_finite_detection_counts_as_miss() {
        let arbiter = SensorArbiter::new();
        let mut p = poller(&arbiter);
        p.start().unwrap();
        let out = p.tick(&Frame::from_targets(vec![tag(7, f64::NAN)]));
        assert_eq!(out, TickOutcome::Pending { cycles: 1 });
        assert_eq!(p.last_target(), None);
        assert!(!p.is_finished());
    }

    #[test]
    fn last_target_reports_resolved_id() {
        let arbiter = SensorArbiter::new();
        let mut p = poller(&arbiter);
        p.start().unwrap();
        p.tick(&Frame::empty());
        assert_eq!(p.last_target(), None);
        p.tick(&Frame::from_targets(vec![tag(12, 3.0), tag(4, 3.5)]));
        assert_eq!(p.last_target(), Some(4));
        p.tick(&Frame::from_targets(vec![tag(7, 3.0)]));
        assert_eq!(p.last_target(), None);
    }

    #[test]
    fn start_rejects_negative_radius_without_leasing() {
        let arbiter = SensorArbiter::new();
        let params = PollerParams {
            geometry: standoff_core::StandoffGeometry {
                safety_margin: -5.0,
                ..Default::default()
            },
            ..PollerParams::default()
        };
        let mut p = AlignmentPoller::from_params("align", &params, arbiter.clone());
        assert!(matches!(p.start(), Err(PollerError::InvalidParams(_))));
        assert_eq!(p.phase(), PollPhase::Idle);
        assert!(!p.is_running());
        assert!(!arbiter.is_held());
    }

    #[test]
    fn cancel_after_success_keeps_finished() {
        let arbiter = SensorArbiter::new();
        let mut p = poller(&arbiter);
        p.start().unwrap();
        p.tick(&Frame::from_targets(vec![tag(4, 3.0)]));
        p.cancel();
        assert_eq!(p.phase(), PollPhase::Succeeded);
        assert!(p.is_finished());
    }

    #[test]
    fn custom_limiter_closure() {
        let arbiter = SensorArbiter::new();
        let resolver = PoseResolver::new(
            standoff_core::StandoffGeometry::default(),
            |a: nalgebra::UnitComplex<f64>| a,
        );
        let mut p = AlignmentPoller::new("align", TargetSelector::default(), resolver, 10, arbiter);
        p.start().unwrap();
        assert!(p.tick(&Frame::from_targets(vec![tag(7, 3.0)])).pose().is_some());
    }
}
