//! Outbound application events.
//!
//! [`Notification`]s go back to the connected controller over the
//! transport.  [`AppEvent`]s go through the
//! [`EventSink`](super::ports::EventSink) port; adapters decide what to do
//! with them (serial log today).

use embassy_time::Instant;

use super::commands::{Command, LightId};
use crate::power::WakeReason;

/// Status pushed to the controller after every light change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    LedOn,
    LedOff,
}

impl Notification {
    /// Wire payload for the notify characteristic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LedOn => "LedOn",
            Self::LedOff => "LedOff",
        }
    }
}

/// Structured events emitted by the device service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Service started; carries the reason the chip booted.
    Started(WakeReason),

    /// A controller connected.
    Connected,

    /// The controller went away.
    Disconnected,

    /// A command was accepted and applied.
    CommandApplied {
        command: Command,
        notification: Notification,
        delivered: bool,
    },

    /// A pulsed light reached its deadline and was switched off.
    PulseExpired(LightId),

    /// Inactivity timeout reached; entering low-power state.
    EnteringSleep { idle_ms: u64 },

    /// Resumed from software sleep.
    Woke { at: Instant },
}
