//! # molsnap-engine
//!
//! The simulation driver. [`Simulation`] owns the particle system, the
//! interaction table, the thermostat and the optional P3M solver, and
//! is the single entry point for checkpointing and restoring them.
//!
//! Also provides TOML configuration, the build-time [`FeatureSet`], a
//! minimal [`Integrator`] and canned scenarios.

pub mod config;
pub mod features;
pub mod integrator;
pub mod scenarios;
pub mod simulation;
pub mod validator;

pub use config::SimulationConfig;
pub use features::FeatureSet;
pub use integrator::{FreeFlight, Integrator};
pub use scenarios::{store_properties, ScenarioKind};
pub use simulation::{Simulation, Status};
pub use validator::validate_config;
