//! Integration tests for molsnap-thermostat.

use glam::DVec3;
use molsnap_thermostat::{Thermostat, ThermostatConfig, ThermostatMode};
use molsnap_types::{MolsnapError, StateObject, SubsystemId};

fn langevin() -> Thermostat {
    Thermostat::new(ThermostatConfig::langevin(1.0, 0.5, 0.01)).unwrap()
}

fn draw(thermostat: &mut Thermostat, n: usize) -> Vec<DVec3> {
    (0..n)
        .map(|i| thermostat.langevin_force(DVec3::new(i as f64, 0.0, -1.0), 1.0))
        .collect()
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn noise_prefactor_derived_from_config() {
    let t = langevin();
    let expected = (24.0 * 1.0 * 0.5 / 0.01f64).sqrt();
    assert!((t.noise_prefactor() - expected).abs() < 1e-12);
}

#[test]
fn invalid_config_names_field() {
    let cases = [
        (ThermostatConfig { kt: -1.0, ..ThermostatConfig::default() }, "kt"),
        (ThermostatConfig { friction: f64::NAN, ..ThermostatConfig::default() }, "friction"),
        (ThermostatConfig { time_step: 0.0, ..ThermostatConfig::default() }, "time_step"),
        (ThermostatConfig { nose_hoover_q: 0.0, ..ThermostatConfig::default() }, "nose_hoover_q"),
    ];
    for (config, field) in cases {
        let err = Thermostat::new(config).unwrap_err();
        assert_eq!(err.field(), Some(field));
    }
}

#[test]
fn config_loads_from_toml() {
    let config: ThermostatConfig = toml::from_str(
        r#"
        mode = "langevin"
        kt = 1.5
        friction = 2.0
        "#,
    )
    .unwrap();
    assert_eq!(config.mode, ThermostatMode::Langevin);
    assert_eq!(config.time_step, ThermostatConfig::default().time_step);
    config.validate().unwrap();
}

// ─── Dynamics Tests ───────────────────────────────────────────

#[test]
fn off_mode_applies_no_force() {
    let mut t = Thermostat::off();
    assert_eq!(t.langevin_force(DVec3::X, 1.0), DVec3::ZERO);
    assert!(!t.is_stochastic());
}

#[test]
fn langevin_force_without_noise_is_pure_friction() {
    let mut t = Thermostat::new(ThermostatConfig::langevin(0.0, 0.5, 0.01)).unwrap();
    let f = t.langevin_force(DVec3::new(2.0, 0.0, 0.0), 1.0);
    assert_eq!(f, DVec3::new(-1.0, 0.0, 0.0));
}

#[test]
fn langevin_noise_is_bounded() {
    let mut t = langevin().with_seed(3);
    let bound = 0.5 * t.noise_prefactor() * 4.0f64.sqrt();
    for _ in 0..100 {
        let f = t.langevin_force(DVec3::ZERO, 4.0);
        assert!(f.abs().max_element() <= bound);
    }
}

#[cfg(feature = "nose-hoover")]
#[test]
fn nose_hoover_cools_hot_system() {
    let config = ThermostatConfig {
        mode: ThermostatMode::NoseHoover,
        kt: 1.0,
        time_step: 0.01,
        nose_hoover_q: 1.0,
        ..ThermostatConfig::default()
    };
    let mut t = Thermostat::new(config).unwrap();
    // 2K = 30 > dof·kT = 3: xi grows and velocities shrink.
    let scale = t.nose_hoover_update(15.0, 3);
    assert!(t.nose_hoover_xi() > 0.0);
    assert!(scale < 1.0);
}

#[cfg(feature = "lowe-andersen")]
#[test]
fn lowe_andersen_conserves_momentum() {
    let config = ThermostatConfig {
        mode: ThermostatMode::LoweAndersen,
        kt: 1.0,
        friction: 1000.0,
        time_step: 0.01,
        ..ThermostatConfig::default()
    };
    let mut t = Thermostat::new(config).unwrap().with_seed(5);
    let (v_a, m_a) = (DVec3::new(1.0, 0.0, 0.0), 1.0);
    let (v_b, m_b) = (DVec3::new(-0.5, 0.2, 0.0), 2.0);
    let (new_a, new_b) = t
        .lowe_andersen_collision((v_a, m_a), (v_b, m_b), DVec3::X)
        .unwrap();
    let before = m_a * v_a + m_b * v_b;
    let after = m_a * new_a + m_b * new_b;
    assert!((before - after).length() < 1e-12);
    // Only the component along the pair axis changes.
    assert_eq!(new_a.y, v_a.y);
    assert_eq!(new_b.y, v_b.y);
}

// ─── Export / Import Tests ────────────────────────────────────

#[test]
fn round_trip_preserves_config_and_xi() {
    let t = langevin().with_seed(1);
    let mut restored = Thermostat::off();
    restored.import(&t.export().unwrap()).unwrap();
    assert_eq!(restored.config(), t.config());
    assert_eq!(restored.nose_hoover_xi(), t.nose_hoover_xi());
    assert_eq!(restored.noise_prefactor(), t.noise_prefactor());
}

#[test]
fn exact_rng_continues_trajectory() {
    let mut original = langevin().with_seed(42);
    draw(&mut original, 17);
    let payload = original.export().unwrap();

    let mut restored = Thermostat::off();
    restored.import(&payload).unwrap();
    assert!(restored.is_reproducible());

    assert_eq!(draw(&mut original, 32), draw(&mut restored, 32));
}

#[test]
fn export_is_pure() {
    let t = langevin().with_seed(9);
    assert_eq!(t.export().unwrap(), t.export().unwrap());
}

#[test]
fn entropy_source_exports_no_rng_state_and_diverges() {
    let original = langevin();
    assert!(!original.is_reproducible());
    let payload = original.export().unwrap();

    let mut a = Thermostat::off();
    let mut b = Thermostat::off();
    a.import(&payload).unwrap();
    b.import(&payload).unwrap();

    assert_eq!(a.config(), original.config());
    assert_ne!(draw(&mut a, 8), draw(&mut b, 8));
}

#[test]
fn failed_import_keeps_previous_state() {
    let mut t = langevin().with_seed(2);
    let before = t.export().unwrap();
    let foreign = molsnap_types::Payload::encode(SubsystemId::Thermostat, 99, &0u8).unwrap();
    let err = t.import(&foreign).unwrap_err();
    assert!(matches!(err, MolsnapError::SchemaMismatch { .. }));
    assert_eq!(t.export().unwrap(), before);
}

#[test]
fn recorded_mode_reads_payload_without_import() {
    let payload = langevin().export().unwrap();
    assert_eq!(Thermostat::recorded_mode(&payload).unwrap(), ThermostatMode::Langevin);

    let off = Thermostat::off().export().unwrap();
    assert_eq!(Thermostat::recorded_mode(&off).unwrap(), ThermostatMode::Off);

    let foreign = molsnap_types::Payload::encode(SubsystemId::Thermostat, 99, &0u8).unwrap();
    assert!(matches!(
        Thermostat::recorded_mode(&foreign),
        Err(MolsnapError::SchemaMismatch { .. })
    ));
}
