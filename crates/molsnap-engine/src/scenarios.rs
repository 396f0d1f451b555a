//! Canned simulations for samples and regression tests.
//!
//! 1. **Store properties**: charged LJ mixture with Langevin noise and a
//!    P3M solver, so every subsystem has state worth checkpointing.
//! 2. **Neutral fluid**: uncharged single-type fluid without a solver,
//!    exercising the optional-record path.

use serde::{Deserialize, Serialize};

use molsnap_thermostat::ThermostatConfig;
use molsnap_types::constants::DEFAULT_TIME_STEP;
use molsnap_types::MolsnapResult;

use crate::config::{P3mSection, PairSection, ParticleSection, SimulationConfig};
use crate::simulation::Simulation;

/// Which canned simulation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    StoreProperties,
    NeutralFluid,
}

impl ScenarioKind {
    pub fn all() -> &'static [ScenarioKind] {
        &[ScenarioKind::StoreProperties, ScenarioKind::NeutralFluid]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::StoreProperties => "store_properties",
            ScenarioKind::NeutralFluid => "neutral_fluid",
        }
    }

    pub fn config(&self) -> SimulationConfig {
        match self {
            ScenarioKind::StoreProperties => store_properties_config(),
            ScenarioKind::NeutralFluid => neutral_fluid_config(),
        }
    }

    /// Builds the scenario's simulation.
    pub fn build(&self) -> MolsnapResult<Simulation> {
        Simulation::from_config(&self.config())
    }
}

/// Ten ±1 charges of two types in a box of side 10, one soft LJ pair,
/// Langevin kT 1.0 γ 0.5, P3M on an 8³ mesh with cao 5.
pub fn store_properties_config() -> SimulationConfig {
    SimulationConfig {
        seed: Some(42),
        particles: ParticleSection {
            count: 10,
            box_length: 10.0,
            charge: 1.0,
            types: 2,
        },
        pairs: vec![PairSection {
            types: [0, 1],
            preset: Some("lj_soft".into()),
            params: None,
        }],
        thermostat: ThermostatConfig::langevin(1.0, 0.5, DEFAULT_TIME_STEP),
        p3m: Some(P3mSection {
            mesh: 8,
            cao: 5,
            accuracy: 1e-2,
            r_cut: 3.0,
            prefactor: 1.0,
        }),
        checkpoint: Default::default(),
    }
}

/// 27 neutral particles of one type with a WCA self-pair and no solver.
pub fn neutral_fluid_config() -> SimulationConfig {
    SimulationConfig {
        seed: Some(7),
        particles: ParticleSection {
            count: 27,
            box_length: 6.0,
            charge: 0.0,
            types: 1,
        },
        pairs: vec![PairSection {
            types: [0, 0],
            preset: Some("wca".into()),
            params: None,
        }],
        thermostat: ThermostatConfig::langevin(1.0, 1.0, DEFAULT_TIME_STEP),
        p3m: None,
        checkpoint: Default::default(),
    }
}

/// Builds the store-properties simulation.
pub fn store_properties() -> MolsnapResult<Simulation> {
    ScenarioKind::StoreProperties.build()
}
