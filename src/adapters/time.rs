//! Monotonic clock adapter.
//!
//! Produces the `embassy_time::Instant`s the device service is driven with.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` (microsecond
//!   precision, monotonic since boot).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side simulation.

use embassy_time::Instant;

/// Microseconds since boot, straight from the ESP-IDF high-resolution timer.
#[cfg(target_os = "espidf")]
pub fn now_micros() -> u64 {
    // SAFETY: plain read of a monotonic hardware counter.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        now_micros()
    }

    /// Microseconds since this clock was created.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn now(&self) -> Instant {
        Instant::from_micros(self.uptime_us())
    }
}
