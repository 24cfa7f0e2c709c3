//! Grader illumination firmware — main entry point.
//!
//! Hexagonal architecture with a cooperative tick loop and deep sleep.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          BleTransport        LogEventSink     │
//! │  (Light+Wake+Sleep)       (Transport)         (EventSink)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            DeviceService (pure logic)                  │    │
//! │  │  Commands · Illumination · PulseTimer · PowerManager   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TransportQueue (BT task → main loop)                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyOutputPin, OutputPin, Pin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use log::info;

use gradelight::adapters::ble::BleTransport;
use gradelight::adapters::hardware::HardwareAdapter;
use gradelight::adapters::log_sink::LogEventSink;
use gradelight::adapters::time::MonotonicClock;
use gradelight::app::commands::LightId;
use gradelight::app::service::{DeviceService, ServiceBinding};
use gradelight::config::DeviceConfig;
use gradelight::drivers::{hw_init, lights::LightDriver, sleep};
use gradelight::error::Error;
use gradelight::events;
use gradelight::pins;

/// Cross-check a claimed output against the board pin map.
fn light_output(light: LightId, pin: AnyOutputPin) -> Result<AnyOutputPin, Error> {
    if pin.pin() != pins::light_gpio(light) {
        return Err(Error::Init("light pin does not match pin map"));
    }
    Ok(pin)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Grader lights v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = DeviceConfig::default();
    config.validate().map_err(Error::from)?;
    info!("Config: {}", config.to_log_json());

    // ── 3. Wake reason ────────────────────────────────────────
    let wake_reason = sleep::wake_cause();
    info!("Boot: {}", wake_reason.as_str());

    // ── 4. Peripherals ────────────────────────────────────────
    let p = Peripherals::take()?;
    let lights = LightDriver::new([
        PinDriver::output(light_output(LightId::Up, p.pins.gpio5.downgrade_output())?)?,
        PinDriver::output(light_output(LightId::Down, p.pins.gpio6.downgrade_output())?)?,
        PinDriver::output(light_output(LightId::Left, p.pins.gpio7.downgrade_output())?)?,
        PinDriver::output(light_output(LightId::Right, p.pins.gpio21.downgrade_output())?)?,
    ]);
    hw_init::init_wake_input(config.wake_mode).map_err(Error::from)?;
    let mut hw = HardwareAdapter::new(lights);

    // ── 5. BLE transport ──────────────────────────────────────
    let mut ble = BleTransport::new(config.device_name.clone());
    ble.init().map_err(Error::from)?;

    // ── 6. Device service ─────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut log_sink = LogEventSink::new();
    let mut service = DeviceService::new(&config, clock.now());
    service.start(wake_reason, &mut hw, &mut ble, &mut log_sink);

    info!("System ready. Entering main loop.");

    // ── 7. Main loop ──────────────────────────────────────────
    loop {
        let now = clock.now();

        let mut binding = ServiceBinding {
            service: &mut service,
            hw: &mut hw,
            transport: &mut ble,
            sink: &mut log_sink,
            now,
        };
        events::drain_events(&mut binding);

        service.tick(now, &mut hw, &mut ble, &mut log_sink);

        FreeRtos::delay_ms(config.tick_interval_ms);
    }
}
