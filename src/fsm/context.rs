//! Shared mutable context threaded through every power-state handler.
//!
//! `PowerContext` is the blackboard the handlers read from and write to:
//! the current time, the activity stamp, the wake input level, and the
//! [`PowerCommands`] the device service must carry out after the tick.

use embassy_time::{Duration, Instant};

use crate::config::WakeMode;

// ---------------------------------------------------------------------------
// Power commands (written by state handlers; consumed by the device service)
// ---------------------------------------------------------------------------

/// Side effects requested by a state transition.
///
/// The service drains these with [`PowerContext::take_commands`] and applies
/// them through its ports.  Each field is one-shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerCommands {
    /// Force every light off and drop any pending pulse.
    pub lights_off: bool,
    /// `Some(true)` start advertising, `Some(false)` stop, `None` leave as is.
    pub advertising: Option<bool>,
    /// Arm the wake condition and suspend the CPU (deep sleep).
    pub suspend: bool,
}

// ---------------------------------------------------------------------------
// PowerContext
// ---------------------------------------------------------------------------

pub struct PowerContext {
    // -- Timing --
    /// Time of the current poll.  Set by the caller before each tick.
    pub now: Instant,

    // -- Activity --
    /// Last connect, disconnect or accepted command.
    pub last_activity: Instant,
    pub inactivity_timeout: Duration,

    // -- Wake --
    pub wake_mode: WakeMode,
    /// Raw level of the wake input at this poll.
    pub wake_input_high: bool,
    /// Set once the wake input has been seen LOW since sleep entry; a wake
    /// needs a LOW to HIGH edge.
    pub wake_armed: bool,

    // -- Outputs --
    pub commands: PowerCommands,
}

impl PowerContext {
    /// Fresh context; the activity clock starts at `now`.
    pub fn new(now: Instant, inactivity_timeout: Duration, wake_mode: WakeMode) -> Self {
        Self {
            now,
            last_activity: now,
            inactivity_timeout,
            wake_mode,
            wake_input_high: false,
            wake_armed: false,
            commands: PowerCommands::default(),
        }
    }

    /// Time since the last activity.  Zero if the clock is behind it.
    pub fn idle_for(&self) -> Duration {
        self.now.saturating_duration_since(self.last_activity)
    }

    pub fn inactivity_expired(&self) -> bool {
        self.idle_for() > self.inactivity_timeout
    }

    /// Move the activity stamp forward.  Never moves it back.
    pub fn touch(&mut self, at: Instant) {
        if at > self.last_activity {
            self.last_activity = at;
        }
    }

    /// Drain the pending commands.
    pub fn take_commands(&mut self) -> PowerCommands {
        core::mem::take(&mut self.commands)
    }
}
