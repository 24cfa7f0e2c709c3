//! Mirror of the physical light outputs.

use super::commands::LightId;
use super::ports::LightPort;

/// On/off level of every light, exactly as last written to the hardware.
///
/// Writes go through [`LightBank::set`], which touches the port only when
/// the level changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightBank {
    levels: [bool; LightId::COUNT],
}

impl LightBank {
    /// All lights off.  Call [`LightBank::sync`] once to force the hardware
    /// into the same state at boot.
    pub const fn new() -> Self {
        Self {
            levels: [false; LightId::COUNT],
        }
    }

    pub fn is_on(&self, light: LightId) -> bool {
        self.levels[light.index()]
    }

    /// Lights currently on.
    pub fn lit(&self) -> impl Iterator<Item = LightId> + '_ {
        LightId::ALL.into_iter().filter(|l| self.is_on(*l))
    }

    pub fn lit_count(&self) -> usize {
        self.levels.iter().filter(|on| **on).count()
    }

    pub fn all_off(&self) -> bool {
        self.lit_count() == 0
    }

    pub fn all_on(&self) -> bool {
        self.lit_count() == LightId::COUNT
    }

    /// Set one light.  Returns `true` if the hardware was written.
    pub fn set(&mut self, light: LightId, on: bool, port: &mut impl LightPort) -> bool {
        let slot = &mut self.levels[light.index()];
        if *slot == on {
            return false;
        }
        *slot = on;
        port.set_light(light, on);
        true
    }

    /// Set every light to `on`.  Returns the number of hardware writes.
    pub fn set_all(&mut self, on: bool, port: &mut impl LightPort) -> usize {
        LightId::ALL
            .into_iter()
            .filter(|l| self.set(*l, on, port))
            .count()
    }

    /// Unconditionally write every level to the hardware.
    pub fn sync(&self, port: &mut impl LightPort) {
        for light in LightId::ALL {
            port.set_light(light, self.is_on(light));
        }
    }
}
