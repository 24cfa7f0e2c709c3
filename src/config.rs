//! Device configuration parameters
//!
//! All tunable parameters for the illumination rig.  Values are fixed at
//! build time: the active [`Deployment`] profile is chosen by Cargo feature
//! (`deployment-legacy`, `deployment-bench`, otherwise `Standard`).

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::app::commands::Vocabulary;
use crate::app::ports::ConfigError;

/// Lit time of a single pulse command.
pub const PULSE_DURATION_MS: u32 = 1_000;

/// Scheduler tick must be at least this many times shorter than every
/// timed behaviour it polls.
pub const TICK_RATIO_MIN: u32 = 10;

/// Name advertised over BLE.  Existing controllers scan for it.
pub const DEVICE_NAME: &str = "Baseball Card Grader Device";

/// Known field deployments of the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deployment {
    /// Current grader app: pulse + set-all vocabulary, 2 min to deep sleep.
    Standard,
    /// First-generation controllers: lowercase tokens, 3 min to deep sleep.
    Legacy,
    /// Bench unit on USB power: polled wake button, 1 min to sleep.
    Bench,
}

impl Deployment {
    /// Profile selected at build time.
    pub const fn active() -> Self {
        if cfg!(feature = "deployment-legacy") {
            Self::Legacy
        } else if cfg!(feature = "deployment-bench") {
            Self::Bench
        } else {
            Self::Standard
        }
    }
}

/// How the device leaves the low-power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WakeMode {
    /// Hardware deep sleep, woken (via reset) by the wake input going LOW.
    DeepSleep,
    /// CPU keeps polling the wake input; HIGH resumes operation in place.
    SoftwarePoll,
}

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Which profile produced this config.
    pub deployment: Deployment,
    /// BLE advertised name.
    pub device_name: heapless::String<32>,

    // --- Timing ---
    /// How long a pulsed light stays on (milliseconds)
    pub pulse_duration_ms: u32,
    /// Idle time before sleeping (milliseconds)
    pub inactivity_timeout_ms: u32,
    /// Main loop tick interval (milliseconds)
    pub tick_interval_ms: u32,

    // --- Protocol / power ---
    /// Accepted command tokens.
    pub vocabulary: Vocabulary,
    /// Sleep flavour and wake polarity.
    pub wake_mode: WakeMode,
}

impl DeviceConfig {
    /// Build the configuration for `deployment`.
    pub fn for_deployment(deployment: Deployment) -> Self {
        let (inactivity_timeout_ms, tick_interval_ms, vocabulary, wake_mode) = match deployment {
            Deployment::Standard => (120_000, 10, Vocabulary::Standard, WakeMode::DeepSleep),
            Deployment::Legacy => (180_000, 100, Vocabulary::WithLegacy, WakeMode::DeepSleep),
            Deployment::Bench => (60_000, 10, Vocabulary::Standard, WakeMode::SoftwarePoll),
        };

        let mut device_name = heapless::String::new();
        // DEVICE_NAME is 27 bytes, always fits.
        let _ = device_name.push_str(DEVICE_NAME);

        Self {
            deployment,
            device_name,
            pulse_duration_ms: PULSE_DURATION_MS,
            inactivity_timeout_ms,
            tick_interval_ms,
            vocabulary,
            wake_mode,
        }
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.pulse_duration_ms))
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.inactivity_timeout_ms))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    /// Reject configurations the scheduler cannot serve with bounded latency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pulse_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("pulse_duration_ms must be > 0"));
        }
        if self.inactivity_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("inactivity_timeout_ms must be > 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        let max_tick = self.tick_interval_ms.saturating_mul(TICK_RATIO_MIN);
        if max_tick > self.pulse_duration_ms {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be <= pulse_duration_ms / 10",
            ));
        }
        if max_tick > self.inactivity_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be <= inactivity_timeout_ms / 10",
            ));
        }
        if self.device_name.is_empty() {
            return Err(ConfigError::ValidationFailed("device_name must not be empty"));
        }
        Ok(())
    }

    /// One-line JSON rendering for the boot log.
    pub fn to_log_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<unserialisable config: {}>", e))
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::for_deployment(Deployment::active())
    }
}
