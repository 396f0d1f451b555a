//! Thermostat state: mode, bath parameters, integrator state and RNG.

use glam::DVec3;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use molsnap_types::{MolsnapError, MolsnapResult, Payload, StateObject, SubsystemId};

use crate::mode::ThermostatMode;
use crate::rng::RngSource;

const SUBSYSTEM: SubsystemId = SubsystemId::Thermostat;

/// Schema version of the thermostat payload.
pub const SCHEMA_VERSION: u32 = 1;

/// User-set thermostat parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    pub mode: ThermostatMode,
    /// Thermal energy of the bath.
    pub kt: f64,
    /// Langevin friction γ, or the Lowe–Andersen collision rate.
    pub friction: f64,
    /// Integration time step. Enters the noise amplitude.
    pub time_step: f64,
    /// Nosé–Hoover thermal inertia Q.
    pub nose_hoover_q: f64,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            mode: ThermostatMode::Off,
            kt: 0.0,
            friction: 0.0,
            time_step: molsnap_types::constants::DEFAULT_TIME_STEP,
            nose_hoover_q: 1.0,
        }
    }
}

impl ThermostatConfig {
    pub fn langevin(kt: f64, friction: f64, time_step: f64) -> Self {
        Self {
            mode: ThermostatMode::Langevin,
            kt,
            friction,
            time_step,
            ..Self::default()
        }
    }

    /// Checks every parameter and that the mode is compiled in.
    pub fn validate(&self) -> MolsnapResult<()> {
        if !self.mode.is_compiled() {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "mode",
                format!(
                    "'{}' requires cargo feature '{}'",
                    self.mode,
                    self.mode.required_feature().unwrap_or("?")
                ),
            ));
        }
        if !(self.kt.is_finite() && self.kt >= 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "kt",
                format!("must be >= 0, got {}", self.kt),
            ));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "friction",
                format!("must be >= 0, got {}", self.friction),
            ));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "time_step",
                format!("must be > 0, got {}", self.time_step),
            ));
        }
        if !(self.nose_hoover_q.is_finite() && self.nose_hoover_q > 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "nose_hoover_q",
                format!("must be > 0, got {}", self.nose_hoover_q),
            ));
        }
        Ok(())
    }

    /// Uniform-noise amplitude `sqrt(24 kT γ / dt)`.
    fn noise_prefactor(&self) -> f64 {
        (24.0 * self.kt * self.friction / self.time_step).sqrt()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThermostatRecord {
    config: ThermostatConfig,
    nose_hoover_xi: f64,
    rng_state: Option<Vec<u64>>,
}

/// Thermostat with its integrator state and random number source.
#[derive(Debug, Clone)]
pub struct Thermostat {
    config: ThermostatConfig,
    /// Nosé–Hoover friction variable ξ.
    xi: f64,
    rng: RngSource,
    /// Derived from `config`; recomputed on every change.
    noise_prefactor: f64,
}

impl Thermostat {
    /// Creates a thermostat backed by an entropy-seeded generator.
    pub fn new(config: ThermostatConfig) -> MolsnapResult<Self> {
        config.validate()?;
        Ok(Self {
            noise_prefactor: config.noise_prefactor(),
            config,
            xi: 0.0,
            rng: RngSource::from_entropy(),
        })
    }

    /// Switches to a reproducible generator seeded with `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = RngSource::seeded(seed);
        self
    }

    /// A thermostat that does nothing.
    pub fn off() -> Self {
        let config = ThermostatConfig::default();
        Self {
            noise_prefactor: 0.0,
            config,
            xi: 0.0,
            rng: RngSource::from_entropy(),
        }
    }

    pub fn config(&self) -> &ThermostatConfig {
        &self.config
    }

    pub fn mode(&self) -> ThermostatMode {
        self.config.mode
    }

    pub fn is_stochastic(&self) -> bool {
        self.config.mode.is_stochastic()
    }

    /// Returns true if the RNG state can be captured exactly.
    pub fn is_reproducible(&self) -> bool {
        self.rng.is_exact()
    }

    pub fn noise_prefactor(&self) -> f64 {
        self.noise_prefactor
    }

    pub fn nose_hoover_xi(&self) -> f64 {
        self.xi
    }

    /// Replaces the bath parameters; integrator and RNG state are kept.
    pub fn set_config(&mut self, config: ThermostatConfig) -> MolsnapResult<()> {
        config.validate()?;
        self.noise_prefactor = config.noise_prefactor();
        self.config = config;
        Ok(())
    }

    /// Langevin friction plus random force on one particle.
    ///
    /// Zero unless the mode is [`ThermostatMode::Langevin`].
    pub fn langevin_force(&mut self, velocity: DVec3, mass: f64) -> DVec3 {
        if self.config.mode != ThermostatMode::Langevin {
            return DVec3::ZERO;
        }
        let amplitude = self.noise_prefactor * mass.sqrt();
        let noise = DVec3::new(
            self.rng.gen::<f64>() - 0.5,
            self.rng.gen::<f64>() - 0.5,
            self.rng.gen::<f64>() - 0.5,
        );
        -self.config.friction * velocity + amplitude * noise
    }

    /// Lowe–Andersen collision between two particles along `separation`.
    ///
    /// With probability `friction · dt` the relative velocity along the
    /// pair axis is redrawn from the Maxwell distribution at kT. Returns
    /// the new velocities, or `None` if no collision happened.
    pub fn lowe_andersen_collision(
        &mut self,
        (v_a, m_a): (DVec3, f64),
        (v_b, m_b): (DVec3, f64),
        separation: DVec3,
    ) -> Option<(DVec3, DVec3)> {
        if self.config.mode != ThermostatMode::LoweAndersen {
            return None;
        }
        let axis = separation.try_normalize()?;
        let probability = (self.config.friction * self.config.time_step).min(1.0);
        if self.rng.gen::<f64>() >= probability {
            return None;
        }
        let reduced_mass = m_a * m_b / (m_a + m_b);
        let sigma = (self.config.kt / reduced_mass).sqrt();
        let drawn = Normal::new(0.0, sigma).ok()?.sample(&mut self.rng);
        let current = (v_a - v_b).dot(axis);
        let impulse = reduced_mass * (drawn - current) * axis;
        Some((v_a + impulse / m_a, v_b - impulse / m_b))
    }

    /// Advances ξ by one step and returns the velocity scale `exp(-ξ dt)`.
    ///
    /// Returns 1.0 unless the mode is [`ThermostatMode::NoseHoover`].
    pub fn nose_hoover_update(&mut self, kinetic_energy: f64, dof: usize) -> f64 {
        if self.config.mode != ThermostatMode::NoseHoover {
            return 1.0;
        }
        let target = dof as f64 * self.config.kt;
        self.xi += self.config.time_step * (2.0 * kinetic_energy - target) / self.config.nose_hoover_q;
        (-self.xi * self.config.time_step).exp()
    }

    /// Reads the mode stored in an exported payload without importing it.
    pub fn recorded_mode(payload: &Payload) -> MolsnapResult<ThermostatMode> {
        let record: ThermostatRecord = payload.decode(SUBSYSTEM, SCHEMA_VERSION)?;
        Ok(record.config.mode)
    }
}

impl StateObject for Thermostat {
    fn subsystem(&self) -> SubsystemId {
        SUBSYSTEM
    }

    fn schema_version(&self) -> u32 {
        SCHEMA_VERSION
    }

    fn export(&self) -> MolsnapResult<Payload> {
        if !self.xi.is_finite() {
            return Err(MolsnapError::invalid_state(
                SUBSYSTEM,
                format!("nose-hoover xi is {}", self.xi),
            ));
        }
        let record = ThermostatRecord {
            config: self.config,
            nose_hoover_xi: self.xi,
            rng_state: self.rng.state(),
        };
        Payload::encode(SUBSYSTEM, SCHEMA_VERSION, &record)
    }

    fn import(&mut self, payload: &Payload) -> MolsnapResult<()> {
        let record: ThermostatRecord = payload.decode(SUBSYSTEM, SCHEMA_VERSION)?;
        record.config.validate()?;
        if !record.nose_hoover_xi.is_finite() {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "nose_hoover_xi",
                format!("must be finite, got {}", record.nose_hoover_xi),
            ));
        }

        let rng = match &record.rng_state {
            Some(words) => RngSource::from_state(words)
                .map_err(|reason| MolsnapError::validation(SUBSYSTEM, "rng_state", reason))?,
            None => {
                if record.config.mode.is_stochastic() {
                    tracing::warn!(
                        mode = %record.config.mode,
                        "no rng state in snapshot; reseeding from entropy, trajectory will not be reproduced"
                    );
                }
                RngSource::from_entropy()
            }
        };

        *self = Self {
            noise_prefactor: record.config.noise_prefactor(),
            config: record.config,
            xi: record.nose_hoover_xi,
            rng,
        };
        tracing::debug!(mode = %self.config.mode, exact_rng = self.rng.is_exact(), "thermostat imported");
        Ok(())
    }
}
