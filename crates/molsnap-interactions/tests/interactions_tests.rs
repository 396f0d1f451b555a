//! Integration tests for molsnap-interactions.

use molsnap_interactions::{InteractionPresets, InteractionTable, LennardJones, TypePair};
use molsnap_types::{MolsnapError, ParticleType, Payload, StateObject, SubsystemId};

fn t(i: u32) -> ParticleType {
    ParticleType(i)
}

// ─── Table Tests ──────────────────────────────────────────────

#[test]
fn pair_lookup_is_symmetric() {
    let mut table = InteractionTable::new();
    table.set(t(2), t(0), LennardJones::new(1.0, 1.2, 2.5)).unwrap();
    assert_eq!(table.get(t(0), t(2)), table.get(t(2), t(0)));
    assert_eq!(table.get(t(0), t(2)).sigma, 1.2);
    assert_eq!(TypePair::new(t(2), t(0)), TypePair::new(t(0), t(2)));
}

#[test]
fn unconfigured_pair_is_inactive() {
    let table = InteractionTable::new();
    let params = table.get(t(1), t(3));
    assert!(!params.is_active());
    assert!(!table.is_configured(t(1), t(3)));
}

#[test]
fn invalid_params_rejected() {
    let mut table = InteractionTable::new();
    let err = table.set(t(0), t(0), LennardJones::new(1.0, -1.0, 2.5)).unwrap_err();
    assert_eq!(err.field(), Some("sigma"));
    assert!(table.is_empty());
}

#[test]
fn set_grows_max_seen_type() {
    let mut table = InteractionTable::new();
    assert_eq!(table.max_seen_type(), None);
    table.set(t(4), t(1), LennardJones::new(1.0, 1.0, 2.5)).unwrap();
    assert_eq!(table.max_seen_type(), Some(4));
}

#[test]
fn max_cutoff_includes_offset() {
    let mut table = InteractionTable::new();
    table.set(t(0), t(0), LennardJones::new(1.0, 1.0, 2.5)).unwrap();
    table
        .set(t(0), t(1), LennardJones::new(1.0, 1.0, 2.0).with_offset(1.0))
        .unwrap();
    assert_eq!(table.max_cutoff(), 3.0);
}

// ─── Export / Import Tests ────────────────────────────────────

#[test]
fn round_trip_preserves_entries_and_symmetry() {
    let mut table = InteractionTable::new();
    table.set(t(1), t(0), LennardJones::new(1.0, 1.0, 2.5).with_auto_shift()).unwrap();
    table.set(t(2), t(2), LennardJones::new(0.3, 0.9, 1.8)).unwrap();

    let payload = table.export().unwrap();
    let mut restored = InteractionTable::new();
    restored.import(&payload).unwrap();

    assert_eq!(restored, table);
    for pair in restored.configured_pairs() {
        let (a, b) = pair.types();
        assert_eq!(restored.get(a, b), restored.get(b, a));
    }
}

#[test]
fn export_is_sparse() {
    let mut table = InteractionTable::new();
    table.set(t(0), t(9), LennardJones::new(1.0, 1.0, 2.5)).unwrap();
    let restored = {
        let mut r = InteractionTable::new();
        r.import(&table.export().unwrap()).unwrap();
        r
    };
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.max_seen_type(), Some(9));
}

#[derive(serde::Serialize)]
struct Entry {
    type_a: u32,
    type_b: u32,
    params: LennardJones,
}

#[derive(serde::Serialize)]
struct Record {
    max_seen_type: Option<u32>,
    entries: Vec<Entry>,
}

#[test]
fn import_rejects_both_orders_of_same_pair() {
    let lj = LennardJones::new(1.0, 1.0, 2.5);
    let record = Record {
        max_seen_type: Some(1),
        entries: vec![
            Entry { type_a: 0, type_b: 1, params: lj },
            Entry { type_a: 1, type_b: 0, params: lj },
        ],
    };
    let payload = Payload::encode(SubsystemId::InteractionTable, 1, &record).unwrap();

    let mut table = InteractionTable::new();
    table.set(t(3), t(3), lj).unwrap();
    let before = table.clone();
    let err = table.import(&payload).unwrap_err();
    assert!(matches!(err, MolsnapError::Validation { field: "entries", .. }));
    assert_eq!(table, before);
}

#[test]
fn import_rejects_type_beyond_recorded_maximum() {
    let record = Record {
        max_seen_type: Some(1),
        entries: vec![Entry {
            type_a: 0,
            type_b: 5,
            params: LennardJones::new(1.0, 1.0, 2.5),
        }],
    };
    let payload = Payload::encode(SubsystemId::InteractionTable, 1, &record).unwrap();
    let err = InteractionTable::new().import(&payload).unwrap_err();
    assert_eq!(err.field(), Some("max_seen_type"));
}

#[test]
fn import_rejects_foreign_payload() {
    let payload = Payload::encode(SubsystemId::Thermostat, 1, &0u32).unwrap();
    let err = InteractionTable::new().import(&payload).unwrap_err();
    assert!(matches!(err, MolsnapError::SchemaMismatch { .. }));
}

// ─── Preset Tests ─────────────────────────────────────────────

#[test]
fn default_presets() {
    let presets = InteractionPresets::with_defaults();
    assert_eq!(presets.names(), vec!["lj_cut", "lj_soft", "wca"]);
    let wca = presets.get("wca").unwrap();
    assert!((wca.shift - 0.25).abs() < 1e-12);
}

#[test]
fn preset_params_serialize() {
    let presets = InteractionPresets::with_defaults();
    let json = serde_json::to_string(presets.get("lj_cut").unwrap()).unwrap();
    let back: LennardJones = serde_json::from_str(&json).unwrap();
    assert_eq!(back.cutoff, 2.5);
}
