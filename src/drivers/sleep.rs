//! Deep-sleep entry and boot wake cause.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::power::WakeReason;

/// Why this boot happened.
#[cfg(target_os = "espidf")]
pub fn wake_cause() -> WakeReason {
    // SAFETY: reads a status register latched at boot.
    let cause = unsafe { esp_sleep_get_wakeup_cause() };
    #[allow(non_upper_case_globals)]
    match cause {
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_UNDEFINED => WakeReason::PowerOn,
        esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO => WakeReason::WakeInput,
        _ => WakeReason::Other,
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn wake_cause() -> WakeReason {
    WakeReason::PowerOn
}

/// Arm wake-on-LOW for the wake input and enter deep sleep.  Does not
/// return: the next code to run is the boot path.
#[cfg(target_os = "espidf")]
pub fn enter_deep_sleep() {
    log::info!("sleep: deep sleep, wake on GPIO{} LOW", crate::pins::WAKE_GPIO);
    // SAFETY: the wake pin is an RTC-capable input configured in hw_init.
    unsafe {
        let ret = esp_deep_sleep_enable_gpio_wakeup(
            crate::pins::WAKE_GPIO_MASK,
            esp_deepsleep_gpio_wake_up_mode_t_ESP_GPIO_WAKEUP_GPIO_LOW,
        );
        if ret != ESP_OK as i32 {
            log::warn!("sleep: arming wake input failed (rc={}), sleeping anyway", ret);
        }
        esp_deep_sleep_start();
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn enter_deep_sleep() {
    log::info!("sleep(sim): deep sleep requested");
}
