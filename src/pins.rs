//! GPIO assignments for the Seeed XIAO ESP32-C3 illumination board.
//!
//! Single source of truth. Every driver references this module rather than
//! hard-coding pin numbers.  XIAO silk-screen labels in brackets.

use crate::app::commands::LightId;

// ---------------------------------------------------------------------------
// Directional lights (active HIGH, driven through low-side MOSFETs)
// ---------------------------------------------------------------------------

/// [D3]
pub const LIGHT_UP_GPIO: i32 = 5;
/// [D4]
pub const LIGHT_DOWN_GPIO: i32 = 6;
/// [D5]
pub const LIGHT_LEFT_GPIO: i32 = 7;
/// [D6]
pub const LIGHT_RIGHT_GPIO: i32 = 21;

/// GPIO number for each light, indexed by [`LightId::index`].
pub const LIGHT_GPIOS: [i32; LightId::COUNT] = [
    LIGHT_UP_GPIO,
    LIGHT_DOWN_GPIO,
    LIGHT_LEFT_GPIO,
    LIGHT_RIGHT_GPIO,
];

pub const fn light_gpio(light: LightId) -> i32 {
    LIGHT_GPIOS[light.index()]
}

// ---------------------------------------------------------------------------
// Wake input
// ---------------------------------------------------------------------------

/// [D0] Wake button.  Pulled up; pressing pulls it LOW.  GPIO2 is in the
/// RTC domain, so it can wake the C3 from deep sleep.
pub const WAKE_GPIO: i32 = 2;

/// `esp_deep_sleep_enable_gpio_wakeup` mask for [`WAKE_GPIO`].
pub const WAKE_GPIO_MASK: u64 = 1 << WAKE_GPIO;
