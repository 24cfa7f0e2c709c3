//! Illumination controller: the only writer of the light outputs.
//!
//! Owns the [`LightBank`] mirror and the [`PulseTimer`].  Pulse commands are
//! exclusive (everything else goes dark first); `ToggleAll*` are absolute
//! set operations.

use embassy_time::{Duration, Instant};
use log::debug;

use super::commands::{Action, Command, LightId};
use super::events::Notification;
use super::lights::LightBank;
use super::ports::LightPort;
use super::pulse::{ActivePulse, PulseTimer};

pub struct IlluminationController {
    lights: LightBank,
    pulse: PulseTimer,
    pulse_duration: Duration,
}

impl IlluminationController {
    pub const fn new(pulse_duration: Duration) -> Self {
        Self {
            lights: LightBank::new(),
            pulse: PulseTimer::new(),
            pulse_duration,
        }
    }

    pub fn lights(&self) -> &LightBank {
        &self.lights
    }

    pub fn pending_pulse(&self) -> Option<ActivePulse> {
        self.pulse.active()
    }

    /// Drive the hardware to match the (all-off) mirror.  Boot only.
    pub fn init(&mut self, port: &mut impl LightPort) {
        self.lights.sync(port);
    }

    /// Apply an accepted command.
    ///
    /// Returns the status to notify, or `None` for [`Command::None`], which
    /// callers are expected to filter out beforehand.
    pub fn apply(
        &mut self,
        cmd: Command,
        now: Instant,
        port: &mut impl LightPort,
    ) -> Option<Notification> {
        match cmd.action() {
            Action::Pulse(light) => {
                if let Some(old) = self.pulse.arm(light, now, self.pulse_duration) {
                    if old.light != light {
                        debug!("pulse {} superseded by {}", old.light.name(), light.name());
                    }
                }
                for other in LightId::ALL.into_iter().filter(|l| *l != light) {
                    self.lights.set(other, false, port);
                }
                self.lights.set(light, true, port);
                Some(Notification::LedOn)
            }
            Action::SetAll(on) => {
                self.pulse.clear();
                self.lights.set_all(on, port);
                Some(if on {
                    Notification::LedOn
                } else {
                    Notification::LedOff
                })
            }
            Action::Ignore => {
                debug_assert!(cmd.is_none());
                None
            }
        }
    }

    /// Pulse timer poll.  Returns the light that went dark, if any.
    pub fn tick(&mut self, now: Instant, port: &mut impl LightPort) -> Option<(LightId, Notification)> {
        let light = self.pulse.poll(now)?;
        self.lights.set(light, false, port);
        Some((light, Notification::LedOff))
    }

    /// Unconditional blackout: every light off, pending pulse dropped.
    /// Used on sleep entry and wake.
    pub fn all_off(&mut self, port: &mut impl LightPort) {
        self.pulse.clear();
        self.lights.set_all(false, port);
    }
}
