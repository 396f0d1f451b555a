//! Integration tests for molsnap-electrostatics.

use molsnap_electrostatics::{P3mParams, P3mSolver};
use molsnap_types::constants::MAX_MESH;
use molsnap_types::{MolsnapError, Payload, StateObject, SubsystemId};

// ─── Tuning Tests ─────────────────────────────────────────────

#[test]
fn default_params_tune() {
    let solver = P3mSolver::new(P3mParams::default()).unwrap();
    let tuning = solver.tuning();
    assert!(tuning.alpha > 0.0);
    assert!(tuning.satisfies(solver.params().accuracy));
    assert_eq!(tuning.influence_function().len(), 512);
    assert_eq!(tuning.influence_function()[0], 0.0);
}

#[test]
fn tuning_is_deterministic() {
    let a = P3mSolver::new(P3mParams::default()).unwrap();
    let b = P3mSolver::new(P3mParams::default()).unwrap();
    assert_eq!(a.tuning(), b.tuning());
}

#[test]
fn unreachable_accuracy_rejected() {
    let params = P3mParams::default().with_accuracy(1e-5);
    let err = P3mSolver::new(params).unwrap_err();
    assert!(matches!(
        err,
        MolsnapError::Validation { subsystem: SubsystemId::LongRangeSolver, field: "accuracy", .. }
    ));
}

#[test]
fn bad_tunables_name_their_field() {
    let cases = [
        (P3mParams::default().with_cao(0), "cao"),
        (P3mParams::default().with_cao(8), "cao"),
        (P3mParams::default().with_mesh(0), "mesh"),
        (P3mParams::default().with_mesh(MAX_MESH + 1), "mesh"),
        (P3mParams::default().with_accuracy(-1.0), "accuracy"),
        (P3mParams::default().with_box([10.0, 0.0, 10.0]), "box_l"),
        (P3mParams { r_cut: 6.0, ..P3mParams::default() }, "r_cut"),
    ];
    for (params, field) in cases {
        let err = P3mSolver::new(params).unwrap_err();
        assert_eq!(err.field(), Some(field), "{params:?}");
    }
}

#[test]
fn self_energy_scales_with_charge_squared() {
    let solver = P3mSolver::new(P3mParams::default()).unwrap();
    let e1 = solver.self_energy(&[1.0, -1.0]);
    let e2 = solver.self_energy(&[2.0, -2.0]);
    assert!(e1 < 0.0);
    assert!((e2 - 4.0 * e1).abs() < 1e-12);
}

// ─── Export / Import Tests ────────────────────────────────────

#[test]
fn round_trip_regenerates_identical_tuning() {
    let solver = P3mSolver::new(P3mParams::default().with_mesh(10)).unwrap();
    let payload = solver.export().unwrap();

    let mut restored = P3mSolver::new(P3mParams::default()).unwrap();
    restored.import(&payload).unwrap();

    assert_eq!(restored.params(), solver.params());
    assert_eq!(restored.tuning(), solver.tuning());
}

#[test]
fn solver_builds_from_payload() {
    let solver = P3mSolver::new(P3mParams::default().with_cao(4)).unwrap();
    let rebuilt = P3mSolver::from_payload(&solver.export().unwrap()).unwrap();
    assert_eq!(rebuilt, solver);
}

#[test]
fn export_holds_only_tunables() {
    let solver = P3mSolver::new(P3mParams::default()).unwrap();
    let payload = solver.export().unwrap();
    let params: P3mParams = payload.decode(SubsystemId::LongRangeSolver, 1).unwrap();
    assert_eq!(&params, solver.params());
}

#[test]
fn failed_import_leaves_solver_untouched() {
    let mut solver = P3mSolver::new(P3mParams::default()).unwrap();
    let before = solver.clone();

    let bad = P3mParams::default().with_accuracy(1e-5);
    let payload = Payload::encode(SubsystemId::LongRangeSolver, 1, &bad).unwrap();
    let err = solver.import(&payload).unwrap_err();

    assert_eq!(err.field(), Some("accuracy"));
    assert_eq!(solver, before);
}

#[test]
fn oversized_mesh_rejected_before_tuning() {
    let huge = P3mParams {
        mesh: [u32::MAX; 3],
        ..P3mParams::default()
    };
    assert!(huge.validate().is_err());
    assert_eq!(huge.mesh_size(), None);

    let mut solver = P3mSolver::new(P3mParams::default()).unwrap();
    let before = solver.clone();
    let payload = Payload::encode(SubsystemId::LongRangeSolver, 1, &huge).unwrap();
    let err = solver.import(&payload).unwrap_err();
    assert_eq!(err.field(), Some("mesh"));
    assert_eq!(solver, before);
}

#[test]
fn mesh_size_counts_points() {
    assert_eq!(P3mParams::default().mesh_size(), Some(512));
    assert_eq!(P3mParams::default().with_mesh(MAX_MESH).mesh_size(), Some(256 * 256 * 256));
}

#[test]
fn import_rejects_newer_schema() {
    let payload = Payload::encode(SubsystemId::LongRangeSolver, 2, &P3mParams::default()).unwrap();
    let err = P3mSolver::new(P3mParams::default())
        .unwrap()
        .import(&payload)
        .unwrap_err();
    assert!(matches!(err, MolsnapError::SchemaMismatch { .. }));
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn params_load_from_toml() {
    let text = r#"
        mesh = [16, 16, 16]
        cao = 3
        accuracy = 0.01
        r_cut = 4.0
        prefactor = 2.0
        box_l = [12.0, 12.0, 12.0]
    "#;
    let params: P3mParams = toml::from_str(text).unwrap();
    assert_eq!(params.mesh, [16; 3]);
    assert_eq!(params.cao, 3);
    params.validate().unwrap();
}
