//! Fuzz target: `DeviceService` under arbitrary write/tick sequences
//!
//! Each input byte pair is one step: the first byte picks the operation,
//! the second is a time advance or a token selector.
//!
//! Invariants checked:
//! - No panics
//! - At most one light lit while a pulse is pending
//! - Nothing is lit once the device is asleep
//!
//! cargo fuzz run fuzz_write_session

#![no_main]

use embassy_time::Instant;
use gradelight::app::commands::LightId;
use gradelight::app::events::AppEvent;
use gradelight::app::ports::{
    EventSink, LightPort, SleepPort, TransportError, TransportPort, WakeInputPort,
};
use gradelight::app::service::DeviceService;
use gradelight::config::{Deployment, DeviceConfig};
use gradelight::fsm::PowerState;
use gradelight::power::WakeReason;
use libfuzzer_sys::fuzz_target;

const TOKENS: [&[u8]; 8] = [
    b"UpPulse",
    b"DownPulse",
    b"LeftPulse",
    b"RightPulse",
    b"ToggleAllOn",
    b"ToggleAllOff",
    b"off",
    b"",
];

#[derive(Default)]
struct Null {
    levels: [bool; LightId::COUNT],
    wake_high: bool,
}

impl LightPort for Null {
    fn set_light(&mut self, light: LightId, on: bool) {
        self.levels[light.index()] = on;
    }
}

impl WakeInputPort for Null {
    fn wake_input_high(&mut self) -> bool {
        self.wake_high
    }
}

impl SleepPort for Null {
    fn enter_deep_sleep(&mut self) {}
}

impl TransportPort for Null {
    fn notify(&mut self, _payload: &str) -> Result<(), TransportError> {
        Ok(())
    }
    fn start_advertising(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
    fn stop_advertising(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = DeviceConfig::for_deployment(Deployment::Bench);
    let mut svc = DeviceService::new(&config, Instant::from_millis(0));
    let (mut hw, mut radio, mut sink) = (Null::default(), Null::default(), Null::default());
    svc.start(WakeReason::PowerOn, &mut hw, &mut radio, &mut sink);

    let mut now = 0u64;
    for step in data.chunks_exact(2) {
        let (op, arg) = (step[0], step[1]);
        let at = Instant::from_millis(now);
        match op % 5 {
            0 => {
                svc.on_write(at, TOKENS[usize::from(arg) % TOKENS.len()], &mut hw, &mut radio, &mut sink);
            }
            1 => svc.on_connect(at, &mut sink),
            2 => svc.on_disconnect(at, &mut radio, &mut sink),
            3 => hw.wake_high = arg & 1 == 1,
            _ => {
                now += u64::from(arg) * 500;
                svc.tick(Instant::from_millis(now), &mut hw, &mut radio, &mut sink);
            }
        }

        let lit = hw.levels.iter().filter(|l| **l).count();
        if svc.pending_pulse().is_some() {
            assert_eq!(lit, 1);
        }
        if svc.power_state() == PowerState::Asleep {
            assert_eq!(lit, 0);
        }
    }
});
