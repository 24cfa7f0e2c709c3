//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeviceService (domain)
//! ```
//!
//! Driven adapters (light outputs, wake input, sleep controller, BLE
//! transport, event sinks) implement these traits.  The
//! [`DeviceService`](super::service::DeviceService) consumes them via
//! generics, so the domain core never touches hardware directly.

use super::commands::LightId;
use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Light port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the four directional lights.
///
/// The domain only calls this for lights whose level actually changed.
pub trait LightPort {
    fn set_light(&mut self, light: LightId, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Power ports (driven adapter: domain → RTC / GPIO)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the wake signal.
pub trait WakeInputPort {
    /// Raw level of the wake input (`true` = HIGH).
    fn wake_input_high(&mut self) -> bool;
}

/// Low-power entry.
pub trait SleepPort {
    /// Arm the wake-on-LOW condition and enter hardware deep sleep.
    ///
    /// On real hardware this never returns; the next thing that runs is
    /// the boot path.  Simulation adapters return so tests can observe
    /// the terminal state.
    fn enter_deep_sleep(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: domain → BLE stack)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the wireless command channel.
pub trait TransportPort {
    /// Publish a status payload to the connected controller.
    fn notify(&mut self, payload: &str) -> Result<(), TransportError>;

    fn start_advertising(&mut self) -> Result<(), TransportError>;

    fn stop_advertising(&mut self) -> Result<(), TransportError>;
}

/// Inbound half of the wireless command channel.
///
/// The BLE stack's connect / disconnect / write callbacks are funnelled
/// into one implementor of this trait, which forwards into the device
/// service.
pub trait CommandChannelHandler {
    fn on_connect(&mut self);
    fn on_disconnect(&mut self);
    fn on_write(&mut self, payload: &[u8]);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`TransportPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No controller is connected (notify has no recipient).
    NotConnected,
    /// The BLE stack is not initialised or has failed.
    StackUnavailable,
    /// The stack rejected the request with the given status code.
    Rejected(i32),
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "no controller connected"),
            Self::StackUnavailable => write!(f, "BLE stack unavailable"),
            Self::Rejected(rc) => write!(f, "BLE stack rejected request (rc={})", rc),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
