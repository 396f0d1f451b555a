//! # molsnap-thermostat
//!
//! Heat-bath coupling and the state it carries between steps.
//!
//! ## Key Types
//!
//! - [`ThermostatMode`]: Off, Langevin, Nosé–Hoover, Lowe–Andersen
//! - [`ThermostatConfig`]: kT, friction, time step and thermal inertia
//! - [`Thermostat`]: config plus integrator state (ξ) and the RNG;
//!   implements [`StateObject`](molsnap_types::StateObject)
//! - [`RngSource`]: exact (ChaCha8) or opaque (entropy) generator
//!
//! ## Features
//!
//! - `nose-hoover`: enables [`ThermostatMode::NoseHoover`]
//! - `lowe-andersen`: enables [`ThermostatMode::LoweAndersen`]
//!
//! Langevin is always available.

pub mod mode;
pub mod rng;
pub mod thermostat;

pub use mode::ThermostatMode;
pub use rng::RngSource;
pub use thermostat::{Thermostat, ThermostatConfig};
