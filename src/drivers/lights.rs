//! Directional light driver.
//!
//! Four binary outputs behind `embedded-hal` [`OutputPin`]s.  On the board
//! these are `esp_idf_hal` `PinDriver`s; host tests hand in mock pins.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::commands::LightId;
use crate::error::GpioError;
use crate::pins;

pub struct LightDriver<P: OutputPin> {
    /// Indexed by [`LightId::index`].
    pins: [P; LightId::COUNT],
}

impl<P: OutputPin> LightDriver<P> {
    /// Takes ownership of the pins in `Up, Down, Left, Right` order and
    /// drives them all LOW.
    pub fn new(pins: [P; LightId::COUNT]) -> Self {
        let mut driver = Self { pins };
        for light in LightId::ALL {
            if let Err(e) = driver.set(light, false) {
                warn!("light {}: {}", light.name(), e);
            }
        }
        driver
    }

    /// Drive one light.
    pub fn set(&mut self, light: LightId, on: bool) -> Result<(), GpioError> {
        let pin = &mut self.pins[light.index()];
        let result = if on { pin.set_high() } else { pin.set_low() };
        result.map_err(|_| GpioError::WriteFailed(pins::light_gpio(light)))
    }

    #[cfg(test)]
    fn release(self) -> [P; LightId::COUNT] {
        self.pins
    }
}
