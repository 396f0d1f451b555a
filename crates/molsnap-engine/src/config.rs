//! Simulation configuration.
//!
//! Loaded from TOML and checked by
//! [`validate_config`](crate::validator::validate_config) before a
//! [`Simulation`](crate::Simulation) is built from it.
//!
//! ```toml
//! seed = 42
//!
//! [particles]
//! count = 10
//! box_length = 10.0
//! charge = 1.0
//! types = 2
//!
//! [[pairs]]
//! types = [0, 1]
//! preset = "lj_soft"
//!
//! [thermostat]
//! mode = "langevin"
//! kt = 1.0
//! friction = 0.5
//!
//! [p3m]
//! mesh = 8
//! cao = 5
//! accuracy = 0.01
//! r_cut = 3.0
//!
//! [checkpoint]
//! layout = "per-subsystem"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use molsnap_checkpoint::Layout;
use molsnap_electrostatics::P3mParams;
use molsnap_interactions::LennardJones;
use molsnap_thermostat::ThermostatConfig;
use molsnap_types::{MolsnapError, MolsnapResult};

/// Complete description of a simulation to set up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the thermostat RNG. Without one the RNG state cannot be
    /// captured exactly.
    pub seed: Option<u64>,
    pub particles: ParticleSection,
    pub pairs: Vec<PairSection>,
    pub thermostat: ThermostatConfig,
    /// Long-range electrostatics; absent means no solver.
    pub p3m: Option<P3mSection>,
    pub checkpoint: CheckpointSection,
}

/// Lattice of particles in a cubic box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSection {
    pub count: usize,
    pub box_length: f64,
    /// Particles alternate between `+charge` and `-charge`.
    pub charge: f64,
    /// Types are assigned round-robin over `0..types`.
    pub types: u32,
}

impl Default for ParticleSection {
    fn default() -> Self {
        Self {
            count: 10,
            box_length: 10.0,
            charge: 0.0,
            types: 1,
        }
    }
}

/// One configured type pair: either a named preset or explicit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSection {
    pub types: [u32; 2],
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub params: Option<LennardJones>,
}

/// P3M tunables; the box is taken from [`ParticleSection`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct P3mSection {
    /// Mesh points per axis.
    pub mesh: u32,
    pub cao: u32,
    pub accuracy: f64,
    pub r_cut: f64,
    pub prefactor: f64,
}

impl Default for P3mSection {
    fn default() -> Self {
        let p = P3mParams::default();
        Self {
            mesh: p.mesh[0],
            cao: p.cao,
            accuracy: p.accuracy,
            r_cut: p.r_cut,
            prefactor: p.prefactor,
        }
    }
}

impl P3mSection {
    pub fn to_params(&self, box_length: f64) -> P3mParams {
        P3mParams {
            mesh: [self.mesh; 3],
            cao: self.cao,
            accuracy: self.accuracy,
            r_cut: self.r_cut,
            prefactor: self.prefactor,
            box_l: [box_length; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointSection {
    pub layout: Layout,
}

impl SimulationConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> MolsnapResult<Self> {
        toml::from_str(text).map_err(|e| MolsnapError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> MolsnapResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| MolsnapError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> MolsnapResult<String> {
        toml::to_string(self).map_err(|e| MolsnapError::InvalidConfig(e.to_string()))
    }

    /// P3M parameters with the configured box, if a solver is requested.
    pub fn p3m_params(&self) -> Option<P3mParams> {
        self.p3m.map(|s| s.to_params(self.particles.box_length))
    }
}
