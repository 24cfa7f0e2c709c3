//! Callback → queue → service dispatch, the way the main loop runs it.

use gradelight::app::commands::LightId;
use gradelight::app::events::AppEvent;
use gradelight::app::service::ServiceBinding;
use gradelight::config::Deployment;
use gradelight::events::{self, MAX_WRITE_LEN, TransportEvent, TransportQueue};

use crate::service_tests::{Rig, at};

fn drain(rig: &mut Rig, queue: &TransportQueue, ms: u64) -> usize {
    let mut binding = ServiceBinding {
        service: &mut rig.svc,
        hw: &mut rig.hw,
        transport: &mut rig.radio,
        sink: &mut rig.sink,
        now: at(ms),
    };
    queue.drain_into(&mut binding)
}

#[test]
fn queued_session_reaches_service() {
    let mut rig = Rig::boot(Deployment::Standard);
    let queue = TransportQueue::new();

    queue.push(TransportEvent::Connected);
    queue.push(TransportEvent::write(b"LeftPulse"));
    assert_eq!(drain(&mut rig, &queue, 200), 2);

    assert!(rig.sink.events.contains(&AppEvent::Connected));
    assert_eq!(rig.hw.lit(), vec![LightId::Left]);
    assert_eq!(rig.radio.notifications(), vec!["LedOn"]);

    rig.tick(1_200);
    assert!(rig.hw.lit().is_empty());

    queue.push(TransportEvent::Disconnected);
    drain(&mut rig, &queue, 1_300);
    assert_eq!(rig.sink.last(), Some(&AppEvent::Disconnected));
}

#[test]
fn oversized_write_is_ignored() {
    let mut rig = Rig::boot(Deployment::Standard);
    let queue = TransportQueue::new();

    let mut long = b"ToggleAllOn".to_vec();
    long.resize(MAX_WRITE_LEN + 4, b' ');
    queue.push(TransportEvent::write(&long));
    drain(&mut rig, &queue, 10);

    assert!(rig.hw.lit().is_empty());
    assert!(rig.radio.notifications().is_empty());
}

#[test]
fn writes_apply_in_arrival_order() {
    let mut rig = Rig::boot(Deployment::Standard);
    let queue = TransportQueue::new();

    queue.push(TransportEvent::write(b"ToggleAllOn"));
    queue.push(TransportEvent::write(b"DownPulse"));
    queue.push(TransportEvent::write(b"Nonsense"));
    drain(&mut rig, &queue, 10);

    assert_eq!(rig.hw.lit(), vec![LightId::Down]);
    assert_eq!(rig.radio.notifications(), vec!["LedOn", "LedOn"]);
    assert_eq!(queue.pop(), None);
}

#[test]
fn global_queue_round_trip() {
    let mut rig = Rig::boot(Deployment::Standard);
    while events::TRANSPORT_EVENTS.pop().is_some() {}

    assert!(events::push_event(TransportEvent::write(b"UpPulse")));
    let mut binding = ServiceBinding {
        service: &mut rig.svc,
        hw: &mut rig.hw,
        transport: &mut rig.radio,
        sink: &mut rig.sink,
        now: at(0),
    };
    assert_eq!(events::drain_events(&mut binding), 1);
    assert_eq!(rig.hw.lit(), vec![LightId::Up]);
}
