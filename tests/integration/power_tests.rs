//! Power lifecycle tests: inactivity sleep and the two wake modes.

use gradelight::app::commands::{Command, LightId};
use gradelight::app::events::AppEvent;
use gradelight::config::Deployment;
use gradelight::fsm::PowerState;

use crate::mock_hw::{HwCall, RadioCall};
use crate::service_tests::{Rig, at};

#[test]
fn bench_profile_sleeps_without_suspending() {
    let mut rig = Rig::boot(Deployment::Bench);
    rig.write(0, "ToggleAllOn");
    rig.radio.clear();

    rig.tick(60_000);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);

    rig.tick(60_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
    assert!(rig.hw.lit().is_empty());
    assert!(!rig.hw.slept());
    assert_eq!(rig.radio.calls, vec![RadioCall::StopAdvertising]);
}

#[test]
fn software_poll_wakes_on_high_input() {
    let mut rig = Rig::boot(Deployment::Bench);
    rig.tick(60_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);

    rig.tick(65_000);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);

    rig.radio.clear();
    rig.hw.clear();
    rig.hw.wake_high = true;
    rig.tick(70_000);

    assert_eq!(rig.svc.power_state(), PowerState::Awake);
    assert_eq!(rig.svc.last_activity(), at(70_000));
    assert!(rig.hw.lit().is_empty());
    assert_eq!(rig.radio.calls, vec![RadioCall::StartAdvertising]);
    assert_eq!(rig.sink.last(), Some(&AppEvent::Woke { at: at(70_000) }));
}

#[test]
fn woken_device_accepts_commands_and_sleeps_again() {
    let mut rig = Rig::boot(Deployment::Bench);
    rig.tick(60_001);
    rig.tick(60_500);
    rig.hw.wake_high = true;
    rig.tick(61_000);
    rig.hw.wake_high = false;

    assert_eq!(rig.write(62_000, "RightPulse"), Some(Command::RightPulse));
    assert_eq!(rig.hw.lit(), vec![LightId::Right]);

    rig.tick(63_000);
    assert!(rig.hw.lit().is_empty());

    // Timeout counts from the command, not from the wake.
    rig.tick(122_000);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);
    rig.tick(122_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
}

#[test]
fn wake_input_held_high_does_not_rewake() {
    let mut rig = Rig::boot(Deployment::Bench);
    rig.hw.wake_high = true;

    rig.tick(60_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
    rig.tick(60_011);
    rig.tick(90_000);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);

    rig.hw.wake_high = false;
    rig.tick(90_010);
    rig.hw.wake_high = true;
    rig.tick(90_020);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);
    assert_eq!(rig.svc.last_activity(), at(90_020));
}

#[test]
fn deep_sleep_profile_ignores_wake_level() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.tick(120_001);
    assert_eq!(rig.hw.calls.last(), Some(&HwCall::DeepSleep));

    rig.hw.wake_high = true;
    rig.tick(130_000);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
}

#[test]
fn legacy_profile_uses_longer_timeout() {
    let mut rig = Rig::boot(Deployment::Legacy);
    rig.tick(170_000);
    assert_eq!(rig.svc.power_state(), PowerState::Awake);
    rig.tick(180_001);
    assert_eq!(rig.svc.power_state(), PowerState::Asleep);
}

#[test]
fn sleep_emits_once() {
    let mut rig = Rig::boot(Deployment::Standard);
    rig.tick(120_001);
    rig.tick(120_011);
    rig.tick(200_000);

    let sleeps = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::EnteringSleep { .. }))
        .count();
    assert_eq!(sleeps, 1);
    assert_eq!(
        rig.hw.calls.iter().filter(|c| **c == HwCall::DeepSleep).count(),
        1
    );
}
