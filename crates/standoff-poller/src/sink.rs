use std::sync::mpsc::Sender;

use standoff_core::StandoffPose;

/// Consumer of the one pose a run produces (usually a motion controller).
pub trait PoseSink {
    fn accept(&mut self, pose: StandoffPose);
}

impl<F> PoseSink for F
where
    F: FnMut(StandoffPose),
{
    fn accept(&mut self, pose: StandoffPose) {
        self(pose)
    }
}

/// Forwards the pose over an mpsc channel, for consumers on another thread.
#[derive(Clone, Debug)]
pub struct ChannelSink(pub Sender<StandoffPose>);

impl PoseSink for ChannelSink {
    fn accept(&mut self, pose: StandoffPose) {
        if self.0.send(pose).is_err() {
            log::warn!("pose receiver dropped; standoff pose {pose} discarded");
        }
    }
}
