//! Power manager: activity watchdog and sleep/wake lifecycle.
//!
//! Wraps the power-state [`Fsm`] and its [`PowerContext`].  The device
//! service feeds it activity stamps and polls it once per tick; any side
//! effects a transition requests come back as [`PowerCommands`].

use embassy_time::{Duration, Instant};

use crate::config::{DeviceConfig, WakeMode};
use crate::fsm::context::{PowerCommands, PowerContext};
use crate::fsm::{Fsm, PowerState, states};

/// Why the chip booted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// Cold boot or reset button.
    PowerOn,
    /// Woken from deep sleep by the wake input.
    WakeInput,
    /// Any other wake source (timer, ULP, ...).
    Other,
}

impl WakeReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PowerOn => "power-on",
            Self::WakeInput => "wake-input",
            Self::Other => "other",
        }
    }
}

/// A completed power transition, reported by [`PowerManager::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerTransition {
    /// Inactivity timeout elapsed; the device is now `Asleep`.
    Sleep { idle: Duration },
    /// Wake input seen while in software sleep; the device is `Awake` again.
    Wake,
}

pub struct PowerManager {
    fsm: Fsm,
    ctx: PowerContext,
}

impl PowerManager {
    /// New manager in `Awake`, activity clock starting at `now`.
    /// Call [`start`](Self::start) before the first poll.
    pub fn new(config: &DeviceConfig, now: Instant) -> Self {
        Self {
            fsm: Fsm::new(states::build_state_table(), PowerState::Awake),
            ctx: PowerContext::new(now, config.inactivity_timeout(), config.wake_mode),
        }
    }

    /// Run the `Awake` entry actions and return the boot-time commands.
    pub fn start(&mut self) -> PowerCommands {
        self.fsm.start(&mut self.ctx);
        self.ctx.take_commands()
    }

    pub fn state(&self) -> PowerState {
        self.fsm.current_state()
    }

    pub fn is_awake(&self) -> bool {
        self.state() == PowerState::Awake
    }

    pub fn wake_mode(&self) -> WakeMode {
        self.ctx.wake_mode
    }

    pub fn last_activity(&self) -> Instant {
        self.ctx.last_activity
    }

    /// Reset the inactivity clock.  Ignored while asleep.
    pub fn record_activity(&mut self, now: Instant) {
        if self.is_awake() {
            self.ctx.touch(now);
        }
    }

    /// One watchdog poll.  `wake_input_high` is the raw wake level; only
    /// consulted while asleep in software-poll mode.
    pub fn poll(&mut self, now: Instant, wake_input_high: bool) -> Option<PowerTransition> {
        self.ctx.now = now;
        self.ctx.wake_input_high = wake_input_high;

        let idle = self.ctx.idle_for();
        match self.fsm.tick(&mut self.ctx)? {
            PowerState::Asleep => Some(PowerTransition::Sleep { idle }),
            PowerState::Awake => Some(PowerTransition::Wake),
        }
    }

    /// Drain the side effects requested by the last transition.
    pub fn take_commands(&mut self) -> PowerCommands {
        self.ctx.take_commands()
    }
}
