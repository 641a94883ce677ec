//! Exclusive ownership of the vision sensor.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::PollerError;

/// Hands out at most one [`SensorLease`] at a time.
///
/// Clones share the same slot, so every command that talks to one camera
/// should be built from clones of one arbiter.
#[derive(Clone, Debug, Default)]
pub struct SensorArbiter {
    slot: Arc<Mutex<Option<String>>>,
}

impl SensorArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the sensor for `owner`, or report who holds it.
    pub fn try_acquire(&self, owner: &str) -> Result<SensorLease, PollerError> {
        let mut slot = self.lock();
        if let Some(current) = slot.as_ref() {
            return Err(PollerError::SensorBusy {
                owner: current.clone(),
            });
        }
        *slot = Some(owner.to_owned());
        log::debug!("sensor leased by `{owner}`");
        Ok(SensorLease {
            slot: Arc::clone(&self.slot),
            owner: owner.to_owned(),
        })
    }

    pub fn owner(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_held(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of exclusive sensor access. Released on drop.
#[derive(Debug)]
pub struct SensorLease {
    slot: Arc<Mutex<Option<String>>>,
    owner: String,
}

impl SensorLease {
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl Drop for SensorLease {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_deref() == Some(self.owner.as_str()) {
            *slot = None;
        }
        log::debug!("sensor released by `{}`", self.owner);
    }
}
