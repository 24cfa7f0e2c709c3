//! Integration tests for the write → illumination → notify pipeline.
//!
//! Drive a [`DeviceService`] through its public entry points with mock
//! adapters and a hand-advanced clock.

use embassy_time::Instant;

use gradelight::app::commands::{Command, LightId};
use gradelight::app::events::{AppEvent, Notification};
use gradelight::app::ports::TransportError;
use gradelight::app::service::DeviceService;
use gradelight::config::{Deployment, DeviceConfig};
use gradelight::fsm::PowerState;
use gradelight::power::WakeReason;

use crate::mock_hw::{HwCall, MockHardware, MockTransport, RadioCall, RecordingSink};

pub struct Rig {
    pub svc: DeviceService,
    pub hw: MockHardware,
    pub radio: MockTransport,
    pub sink: RecordingSink,
}

pub fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

impl Rig {
    /// Booted at t=0 with the given profile.
    pub fn boot(deployment: Deployment) -> Self {
        let config = DeviceConfig::for_deployment(deployment);
        let mut rig = Self {
            svc: DeviceService::new(&config, at(0)),
            hw: MockHardware::new(),
            radio: MockTransport::new(),
            sink: RecordingSink::new(),
        };
        rig.svc
            .start(WakeReason::PowerOn, &mut rig.hw, &mut rig.radio, &mut rig.sink);
        rig
    }

    pub fn write(&mut self, ms: u64, token: &str) -> Option<Command> {
        self.svc.on_write(
            at(ms),
            token.as_bytes(),
            &mut self.hw,
            &mut self.radio,
            &mut self.sink,
        )
    }

    pub fn tick(&mut self, ms: u64) {
        self.svc
            .tick(at(ms), &mut self.hw, &mut self.radio, &mut self.sink);
    }

    pub fn connect(&mut self, ms: u64) {
        self.svc.on_connect(at(ms), &mut self.sink);
    }

    pub fn disconnect(&mut self, ms: u64) {
        self.svc.on_disconnect(at(ms), &mut self.radio, &mut self.sink);
    }
}

#[test]
fn boot_leaves_lights_dark_and_advertising() {
    let rig = Rig::boot(Deployment::Standard);
    assert!(rig.hw.lit().is_empty());
    assert!(rig.radio.advertising);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);
    assert_eq!(
        rig.sink.events.first(),
        Some(&AppEvent::Started(WakeReason::PowerOn))
    );
}

#[test]
fn pulse_then_expiry_then_sleep() {
    let mut rig = Rig::boot(Deployment::Standard);

    assert_eq!(rig.write(500, "UpPulse"), Some(Command::UpPulse));
    assert_eq!(rig.hw.lit(), vec![LightId::Up]);
    let pulse = rig.svc.pending_pulse().expect("pulse armed");
    assert_eq!(pulse.light, LightId::Up);
    assert_eq!(pulse.deadline, at(1_500));
    assert_eq!(rig.svc.last_activity(), at(500));

    rig.tick(1_000);
    assert_eq!(rig.hw.lit(), vec![LightId::Up]);

    rig.tick(1_600);
    assert!(rig.hw.lit().is_empty());
    assert_eq!(rig.svc.pending_pulse(), None);
    assert_eq!(rig.radio.notifications(), vec!["LedOn", "LedOff"]);
    assert_eq!(rig.sink.last(), Some(&AppEvent::PulseExpired(LightId::Up)));

    rig.tick(120_500);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);

    rig.tick(120_510);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
    assert!(rig.hw.slept());
    assert!(!rig.radio.advertising);
    assert_eq!(rig.sink.last(), Some(&AppEvent::EnteringSleep { idle_ms: 120_010 }));
}

#[test]
fn at_most_one_pulsed_light() {
    let mut rig = Rig::boot(Deployment::Standard);

    rig.write(0, "UpPulse");
    rig.write(300, "LeftPulse");
    assert_eq!(rig.hw.lit(), vec![LightId::Left]);

    rig.write(600, "DownPulse");
    assert_eq!(rig.hw.lit(), vec![LightId::Down]);

    // Deadlines of the superseded pulses pass silently.
    rig.tick(1_000);
    rig.tick(1_300);
    assert_eq!(rig.hw.lit(), vec![LightId::Down]);

    rig.tick(1_600);
    assert!(rig.hw.lit().is_empty());
}

#[test]
fn toggle_all_on_survives_ticks() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.write(0, "RightPulse");
    rig.write(100, "ToggleAllOn");

    assert_eq!(rig.hw.lit(), LightId::ALL.to_vec());
    assert_eq!(rig.svc.pending_pulse(), None);

    rig.tick(1_100);
    rig.tick(5_000);
    assert_eq!(rig.hw.lit(), LightId::ALL.to_vec());
}

#[test]
fn toggle_all_off_from_any_state() {
    let mut rig = Rig::boot(Deployment::Standard);

    rig.write(0, "ToggleAllOff");
    assert!(rig.hw.lit().is_empty());

    rig.write(10, "ToggleAllOn");
    rig.write(20, "ToggleAllOff");
    assert!(rig.hw.lit().is_empty());

    rig.write(30, "UpPulse");
    rig.write(40, "ToggleAllOff");
    assert!(rig.hw.lit().is_empty());
    assert_eq!(rig.radio.notifications().last().map(String::as_str), Some("LedOff"));
}

#[test]
fn outputs_written_only_on_change() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.hw.clear();

    rig.write(0, "ToggleAllOn");
    assert_eq!(rig.hw.light_writes(), 4);
    rig.write(10, "ToggleAllOn");
    assert_eq!(rig.hw.light_writes(), 4);

    rig.hw.clear();
    rig.write(20, "UpPulse");
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::SetLight { light: LightId::Down, on: false },
            HwCall::SetLight { light: LightId::Left, on: false },
            HwCall::SetLight { light: LightId::Right, on: false },
        ]
    );
}

#[test]
fn every_accepted_command_notifies_once() {
    let mut rig = Rig::boot(Deployment::Standard);
    let tokens = ["UpPulse", "ToggleAllOn", "DownPulse", "ToggleAllOff", "RightPulse"];
    for (i, token) in tokens.iter().enumerate() {
        rig.write(i as u64 * 10, token);
    }
    assert_eq!(
        rig.radio.notifications(),
        vec!["LedOn", "LedOn", "LedOn", "LedOff", "LedOn"]
    );
}

#[test]
fn unrecognised_tokens_change_nothing() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.write(0, "LeftPulse");
    rig.radio.clear();
    rig.hw.clear();
    let events_before = rig.sink.events.len();

    for junk in ["", " ", "upPulse", "UPPULSE", "LeftPulse\n", "Toggle", "up"] {
        assert_eq!(rig.write(100, junk), None, "{:?}", junk);
    }

    assert!(rig.radio.calls.is_empty());
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.sink.events.len(), events_before);
    assert_eq!(rig.svc.last_activity(), at(0));
}

#[test]
fn legacy_profile_accepts_lowercase_tokens() {
    let mut rig = Rig::boot(Deployment::Legacy);
    assert_eq!(rig.write(0, "left"), Some(Command::LeftPulse));
    assert_eq!(rig.hw.lit(), vec![LightId::Left]);
    assert_eq!(rig.write(10, "off"), Some(Command::ToggleAllOff));
    assert!(rig.hw.lit().is_empty());
}

#[test]
fn notify_failure_keeps_state_change() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.radio.fail_with = Some(TransportError::NotConnected);

    assert_eq!(rig.write(50, "ToggleAllOn"), Some(Command::ToggleAllOn));
    assert_eq!(rig.hw.lit(), LightId::ALL.to_vec());
    assert_eq!(rig.svc.last_activity(), at(50));
    assert_eq!(
        rig.sink.last(),
        Some(&AppEvent::CommandApplied {
            command: Command::ToggleAllOn,
            notification: Notification::LedOn,
            delivered: false,
        })
    );
}

#[test]
fn connection_events_reset_activity() {
    let mut rig = Rig::boot(Deployment::Standard);

    rig.connect(70_000);
    assert_eq!(rig.sink.last(), Some(&AppEvent::Connected));
    assert_eq!(rig.svc.last_activity(), at(70_000));

    rig.tick(150_000);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);

    rig.radio.clear();
    rig.disconnect(160_000);
    assert_eq!(rig.svc.last_activity(), at(160_000));
    assert_eq!(rig.radio.calls, vec![RadioCall::StartAdvertising]);
    assert_eq!(rig.sink.last(), Some(&AppEvent::Disconnected));

    rig.tick(280_000);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);
    rig.tick(280_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
}

#[test]
fn activity_clock_never_moves_back() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.write(5_000, "UpPulse");
    rig.connect(4_000);
    assert_eq!(rig.svc.last_activity(), at(5_000));
}

#[test]
fn sleep_forces_lights_off() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.write(1_000, "ToggleAllOn");

    rig.tick(121_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
    assert!(rig.hw.lit().is_empty());

    // Sleep entry order: lights, radio, then suspend.
    assert_eq!(rig.hw.calls.last(), Some(&HwCall::DeepSleep));
}

#[test]
fn asleep_ignores_writes_ticks_and_disconnects() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.tick(120_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);

    rig.hw.clear();
    rig.radio.clear();
    let events_before = rig.sink.events.len();

    assert_eq!(rig.write(130_000, "ToggleAllOn"), None);
    rig.disconnect(130_010);
    rig.tick(140_000);

    assert!(rig.hw.calls.is_empty());
    assert!(rig.radio.calls.is_empty());
    assert_eq!(rig.sink.events.len(), events_before);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
}

#[test]
fn sleep_proceeds_when_radio_fails() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.write(0, "UpPulse");
    rig.radio.fail_with = Some(TransportError::StackUnavailable);

    rig.tick(120_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
    assert!(rig.hw.lit().is_empty());
    assert!(rig.hw.slept());
}
