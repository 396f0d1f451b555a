//! Integration tests for molsnap-telemetry.

use molsnap_telemetry::bus::EventBus;
use molsnap_telemetry::events::{CheckpointEvent, EventKind};
use molsnap_telemetry::sinks::{TracingSink, VecSink};
use molsnap_types::SubsystemId;

#[test]
fn emit_and_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.emit(CheckpointEvent::new(0, EventKind::RestoreBegin { target: "out".into() }));
    bus.emit(CheckpointEvent::new(0, EventKind::Restored { records: 4 }));
    assert!(sink.is_empty());

    bus.flush();
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, EventKind::Restored { records: 4 });
}

#[test]
fn disabled_bus_drops_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    bus.set_enabled(false);
    bus.emit(CheckpointEvent::new(0, EventKind::Restored { records: 1 }));
    bus.flush();
    assert!(sink.is_empty());
}

#[test]
fn multiple_sinks() {
    let mut bus = EventBus::new();
    let a = VecSink::new();
    bus.add_sink(Box::new(a.clone()));
    bus.add_sink(Box::new(TracingSink::new()));
    assert_eq!(bus.sink_count(), 2);

    bus.emit(CheckpointEvent::new(
        3,
        EventKind::CheckpointFailed {
            subsystem: Some(SubsystemId::Thermostat),
            reason: "disk full".into(),
        },
    ));
    bus.finalize();
    assert!(a.events()[0].is_failure());
}

#[test]
fn event_serialization() {
    let event = CheckpointEvent::new(
        5,
        EventKind::RecordExported {
            subsystem: SubsystemId::LongRangeSolver,
            bytes: 64,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    let recovered: CheckpointEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}
