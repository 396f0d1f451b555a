//! Integration tests for molsnap-particles.

use glam::DVec3;
use molsnap_particles::generators::cubic_lattice;
use molsnap_particles::{Bond, Particle, ParticleSystem, UnitSystem};
use molsnap_types::{MolsnapError, ParticleId, Payload, StateObject, SubsystemId};

fn sample_system() -> ParticleSystem {
    let mut sys = cubic_lattice(10, 10.0).unwrap();
    for (i, id) in sys.ids().into_iter().enumerate() {
        let v = DVec3::new(0.1 * i as f64, -0.05 * i as f64, 0.3);
        sys.set_velocity(id, v).unwrap();
    }
    sys.add_bond(Bond::new(0, 0, 1)).unwrap();
    sys.add_bond(Bond::new(1, 3, 2)).unwrap();
    sys
}

// ─── Store Tests ──────────────────────────────────────────────

#[test]
fn lattice_positions_inside_box() {
    let sys = cubic_lattice(27, 6.0).unwrap();
    assert_eq!(sys.len(), 27);
    for p in sys.particles() {
        for axis in 0..3 {
            assert!(p.position[axis] > 0.0 && p.position[axis] < 6.0);
        }
    }
}

#[test]
fn duplicate_id_rejected() {
    let mut sys = ParticleSystem::new([3.0; 3], UnitSystem::Reduced).unwrap();
    sys.add_particle(Particle::new(1, DVec3::ZERO)).unwrap();
    let err = sys.add_particle(Particle::new(1, DVec3::ONE)).unwrap_err();
    assert_eq!(err.field(), Some("particles.id"));
}

#[test]
fn non_positive_mass_rejected() {
    let mut sys = ParticleSystem::new([3.0; 3], UnitSystem::Reduced).unwrap();
    let err = sys
        .add_particle(Particle::new(1, DVec3::ZERO).with_mass(0.0))
        .unwrap_err();
    assert_eq!(err.field(), Some("particles.mass"));
}

#[test]
fn dangling_bond_rejected() {
    let mut sys = cubic_lattice(2, 3.0).unwrap();
    assert!(sys.add_bond(Bond::new(0, 0, 9)).is_err());
    assert!(sys.add_bond(Bond::new(0, 1, 1)).is_err());
    assert!(sys.add_bond(Bond::new(0, 0, 1)).is_ok());
}

#[test]
fn invalid_box_rejected() {
    assert!(ParticleSystem::new([1.0, 0.0, 1.0], UnitSystem::Reduced).is_err());
}

#[test]
fn kinetic_energy_sums_particles() {
    let mut sys = ParticleSystem::new([3.0; 3], UnitSystem::Reduced).unwrap();
    sys.add_particle(Particle::new(0, DVec3::ZERO).with_velocity(DVec3::X).with_mass(2.0))
        .unwrap();
    sys.add_particle(Particle::new(1, DVec3::ONE).with_velocity(DVec3::new(0.0, 2.0, 0.0)))
        .unwrap();
    assert!((sys.kinetic_energy() - 3.0).abs() < 1e-12);
}

#[test]
fn charge_summary_counts_charged() {
    let mut sys = ParticleSystem::new([3.0; 3], UnitSystem::Reduced).unwrap();
    sys.add_particle(Particle::new(0, DVec3::ZERO).with_charge(1.0)).unwrap();
    sys.add_particle(Particle::new(1, DVec3::ONE).with_charge(-2.0)).unwrap();
    sys.add_particle(Particle::new(2, DVec3::splat(2.0))).unwrap();
    assert_eq!(sys.charge_summary(), (2, 5.0));
}

#[test]
fn fold_wraps_periodic_axes_only() {
    let mut sys = ParticleSystem::new([2.0; 3], UnitSystem::Reduced).unwrap();
    sys.set_periodic([true, true, false]);
    sys.add_particle(Particle::new(0, DVec3::new(2.5, -0.5, 3.0))).unwrap();
    sys.fold_positions();
    let p = sys.particle(ParticleId(0)).unwrap().position;
    assert!((p.x - 0.5).abs() < 1e-12);
    assert!((p.y - 1.5).abs() < 1e-12);
    assert_eq!(p.z, 3.0);
}

// ─── Export / Import Tests ────────────────────────────────────

#[test]
fn export_is_byte_identical_when_unchanged() {
    let sys = sample_system();
    assert_eq!(sys.export().unwrap(), sys.export().unwrap());
}

#[test]
fn export_order_independent_of_insertion_order() {
    let mut a = ParticleSystem::new([4.0; 3], UnitSystem::Reduced).unwrap();
    let mut b = ParticleSystem::new([4.0; 3], UnitSystem::Reduced).unwrap();
    for i in [3u32, 1, 2] {
        a.add_particle(Particle::new(i, DVec3::splat(i as f64))).unwrap();
    }
    for i in [1u32, 2, 3] {
        b.add_particle(Particle::new(i, DVec3::splat(i as f64))).unwrap();
    }
    assert_eq!(a.export().unwrap(), b.export().unwrap());
}

#[test]
fn import_restores_all_fields() {
    let mut original = sample_system();
    original.advance_time(0.01);
    original.set_force(ParticleId(4), DVec3::new(1.5, 0.0, -2.0)).unwrap();
    let payload = original.export().unwrap();

    let mut restored = ParticleSystem::new([1.0; 3], UnitSystem::Reduced).unwrap();
    restored.import(&payload).unwrap();

    assert_eq!(restored.particles(), original.particles());
    assert_eq!(restored.box_l(), [10.0; 3]);
    assert_eq!(restored.step_count(), 1);
    assert_eq!(restored.sim_time(), original.sim_time());
    assert_eq!(restored.bonds().len(), 2);
    assert!(restored.validate().is_ok());
}

#[test]
fn import_rejects_unit_mismatch() {
    let payload = sample_system().export().unwrap();
    let mut si = ParticleSystem::new([1.0; 3], UnitSystem::Si).unwrap();
    let err = si.import(&payload).unwrap_err();
    assert_eq!(err.field(), Some("units"));
    assert!(si.is_empty());
}

#[test]
fn import_rejects_duplicate_ids_and_keeps_state() {
    // Hand-build a payload whose particle list repeats an id.
    #[derive(serde::Serialize)]
    struct Record {
        units: UnitSystem,
        box_l: [f64; 3],
        periodic: [bool; 3],
        sim_time: f64,
        step: u64,
        particles: Vec<Particle>,
        bonds: Vec<Bond>,
    }
    let record = Record {
        units: UnitSystem::Reduced,
        box_l: [5.0; 3],
        periodic: [true; 3],
        sim_time: 0.0,
        step: 0,
        particles: vec![Particle::new(2, DVec3::ZERO), Particle::new(2, DVec3::ONE)],
        bonds: vec![],
    };
    let payload = Payload::encode(SubsystemId::ParticleSystem, 1, &record).unwrap();

    let mut sys = sample_system();
    let before = sys.export().unwrap();
    let err = sys.import(&payload).unwrap_err();
    assert!(matches!(err, MolsnapError::Validation { field: "particles.id", .. }));
    assert_eq!(sys.export().unwrap(), before);
}

#[test]
fn import_rejects_wrong_schema_version() {
    let mut payload = sample_system().export().unwrap();
    payload.schema_version = 99;
    let mut sys = sample_system();
    sys.set_position(ParticleId(0), DVec3::splat(9.0)).unwrap();
    let before = sys.export().unwrap();
    let err = sys.import(&payload).unwrap_err();
    assert!(matches!(err, MolsnapError::SchemaMismatch { .. }));
    assert_eq!(sys.export().unwrap(), before);
}

#[test]
fn raw_body_is_bincode() {
    let payload = sample_system().export().unwrap();
    // The body starts with the unit tag (u32 variant index 0 for Reduced).
    let tag: u32 = bincode::deserialize(&payload.body[..4]).unwrap();
    assert_eq!(tag, 0);
}
