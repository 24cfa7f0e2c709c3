//! One-shot pulse deadline.
//!
//! Replaces the blocking `delay()`-based pulse of the first firmware: the
//! timer only records *when* the pulsed light must go dark, and
//! [`PulseTimer::poll`] is checked from the cooperative tick.

use embassy_time::{Duration, Instant};

use super::commands::LightId;

/// The in-flight pulse, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePulse {
    pub light: LightId,
    pub deadline: Instant,
}

/// At most one pending pulse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseTimer {
    active: Option<ActivePulse>,
}

impl PulseTimer {
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Start (or restart) the pulse for `light`.  Returns the pulse it
    /// replaced.
    pub fn arm(&mut self, light: LightId, now: Instant, duration: Duration) -> Option<ActivePulse> {
        self.active.replace(ActivePulse {
            light,
            deadline: now + duration,
        })
    }

    /// Drop the pending pulse without firing it.
    pub fn clear(&mut self) -> Option<ActivePulse> {
        self.active.take()
    }

    pub fn active(&self) -> Option<ActivePulse> {
        self.active
    }

    /// Fire the pulse if its deadline has passed.  Fires at most once.
    pub fn poll(&mut self, now: Instant) -> Option<LightId> {
        match self.active {
            Some(pulse) if now >= pulse.deadline => {
                self.active = None;
                Some(pulse.light)
            }
            _ => None,
        }
    }
}
