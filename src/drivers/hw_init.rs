//! One-shot hardware peripheral initialization.
//!
//! Configures the wake input using raw ESP-IDF sys calls.  Light outputs are
//! owned by `PinDriver`s created in `main()`.  Called once before the main
//! loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::config::WakeMode;
use crate::error::GpioError;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Configure the wake input for `mode`.
///
/// Deep-sleep wake is active LOW, so the pin gets a pull-up; software-poll
/// wake is active HIGH and gets a pull-down.
#[cfg(target_os = "espidf")]
pub fn init_wake_input(mode: WakeMode) -> Result<(), GpioError> {
    let (pull_up_en, pull_down_en) = match mode {
        WakeMode::DeepSleep => (
            gpio_pullup_t_GPIO_PULLUP_ENABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        ),
        WakeMode::SoftwarePoll => (
            gpio_pullup_t_GPIO_PULLUP_DISABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        ),
    };
    let cfg = gpio_config_t {
        pin_bit_mask: pins::WAKE_GPIO_MASK,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en,
        pull_down_en,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: called once from main() before the loop; single-threaded.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(GpioError::ConfigFailed(pins::WAKE_GPIO));
    }
    info!("hw_init: wake input GPIO{} configured ({:?})", pins::WAKE_GPIO, mode);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_wake_input(mode: WakeMode) -> Result<(), GpioError> {
    log::info!("hw_init(sim): wake input ({:?}) skipped", mode);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on a configured input.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulated inputs idle LOW.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}
