//! Unified error type for the illumination firmware.
//!
//! A single `Copy` enum every subsystem converts into, so bootstrap code
//! can propagate with `?` and log uniformly.  Port-level errors
//! ([`TransportError`], [`ConfigError`]) keep their own small enums and
//! convert in via `From`.

use core::fmt;

use crate::app::ports::{ConfigError, TransportError};

/// Every fallible platform operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO could not be configured, read or written.
    Gpio(GpioError),
    /// The wireless transport failed.
    Transport(TransportError),
    /// Peripheral or stack initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// `gpio_config` rejected the pin setup.  Carries the pin number.
    ConfigFailed(i32),
    /// Level write failed.
    WriteFailed(i32),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFailed(pin) => write!(f, "config of GPIO{pin} failed"),
            Self::WriteFailed(pin) => write!(f, "write to GPIO{pin} failed"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
