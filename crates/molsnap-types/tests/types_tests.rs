//! Integration tests for molsnap-types.

use serde::{Deserialize, Serialize};
use molsnap_types::{MolsnapError, ParticleId, ParticleType, Payload, SubsystemId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn particle_ids_order_by_value() {
    let mut ids = vec![ParticleId(7), ParticleId(2), ParticleId(5)];
    ids.sort();
    assert_eq!(ids, vec![ParticleId(2), ParticleId(5), ParticleId(7)]);
}

#[test]
fn ids_are_serializable() {
    let id = ParticleId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ParticleId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

#[test]
fn particle_type_index() {
    assert_eq!(ParticleType(3).index(), 3);
}

#[test]
fn file_stems_match_sample_outputs() {
    assert_eq!(SubsystemId::LongRangeSolver.file_stem(), "p3m_save");
    assert_eq!(SubsystemId::ParticleSystem.file_stem(), "system_save");
    assert_eq!(SubsystemId::Thermostat.file_stem(), "thermostat_save");
    assert_eq!(SubsystemId::InteractionTable.file_stem(), "non_bonded_inter_save");
}

// ─── Payload Tests ────────────────────────────────────────────

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Dto {
    kt: f64,
    steps: u64,
}

#[test]
fn payload_decode_checks_version() {
    let payload = Payload::encode(SubsystemId::Thermostat, 2, &Dto { kt: 1.0, steps: 3 }).unwrap();
    let err = payload.decode::<Dto>(SubsystemId::Thermostat, 1).unwrap_err();
    assert!(matches!(err, MolsnapError::SchemaMismatch { .. }));
    assert!(err.to_string().contains("schema v1"));
}

#[test]
fn payload_decode_checks_subsystem() {
    let payload = Payload::encode(SubsystemId::Thermostat, 1, &Dto { kt: 1.0, steps: 3 }).unwrap();
    let err = payload.decode::<Dto>(SubsystemId::LongRangeSolver, 1).unwrap_err();
    assert!(matches!(
        err,
        MolsnapError::SchemaMismatch { subsystem: SubsystemId::LongRangeSolver, .. }
    ));
}

#[test]
fn payload_decode_rejects_truncated_body() {
    let mut payload = Payload::encode(SubsystemId::Thermostat, 1, &Dto { kt: 1.0, steps: 3 }).unwrap();
    payload.body.truncate(4);
    let err = payload.decode::<Dto>(SubsystemId::Thermostat, 1).unwrap_err();
    assert!(matches!(err, MolsnapError::Serialization(_)));
}

#[test]
fn payload_decode_returns_value() {
    let dto = Dto { kt: 0.25, steps: 42 };
    let payload = Payload::encode(SubsystemId::Thermostat, 1, &dto).unwrap();
    assert!(!payload.is_empty());
    assert_eq!(payload.decode::<Dto>(SubsystemId::Thermostat, 1).unwrap(), dto);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn validation_error_names_field() {
    let err = MolsnapError::validation(SubsystemId::ParticleSystem, "particles.id", "duplicate id #4");
    let msg = err.to_string();
    assert!(msg.contains("system.particles.id"));
    assert_eq!(err.field(), Some("particles.id"));
}

#[test]
fn restore_error_wraps_source() {
    let inner = MolsnapError::validation(SubsystemId::LongRangeSolver, "box_l", "mismatch");
    let err = MolsnapError::Restore {
        subsystem: SubsystemId::LongRangeSolver,
        source: Box::new(inner),
    };
    assert_eq!(err.subsystem(), Some(SubsystemId::LongRangeSolver));
    assert_eq!(err.field(), Some("box_l"));
    assert!(err.to_string().starts_with("Restore of p3m failed"));
}
