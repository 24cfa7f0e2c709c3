//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`LightDriver`] and exposes it, the wake input and the sleep
//! controller through [`LightPort`], [`WakeInputPort`] and [`SleepPort`].
//! This is the only module in the system that touches actual hardware.  On
//! non-espidf targets the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::commands::LightId;
use crate::app::ports::{LightPort, SleepPort, WakeInputPort};
use crate::drivers::hw_init::gpio_read;
use crate::drivers::lights::LightDriver;
use crate::drivers::sleep;
use crate::pins;

pub struct HardwareAdapter<P: OutputPin> {
    lights: LightDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(lights: LightDriver<P>) -> Self {
        Self { lights }
    }
}

impl<P: OutputPin> LightPort for HardwareAdapter<P> {
    fn set_light(&mut self, light: LightId, on: bool) {
        if let Err(e) = self.lights.set(light, on) {
            warn!("light {}: {}", light.name(), e);
        }
    }
}

impl<P: OutputPin> WakeInputPort for HardwareAdapter<P> {
    fn wake_input_high(&mut self) -> bool {
        gpio_read(pins::WAKE_GPIO)
    }
}

impl<P: OutputPin> SleepPort for HardwareAdapter<P> {
    fn enter_deep_sleep(&mut self) {
        sleep::enter_deep_sleep();
    }
}
