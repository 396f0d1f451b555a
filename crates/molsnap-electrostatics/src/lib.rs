//! # molsnap-electrostatics
//!
//! Particle-particle particle-mesh (P3M) long-range electrostatics state.
//!
//! ## Key Types
//!
//! - [`P3mParams`]: user-set tunables (mesh, charge assignment order,
//!   accuracy target, real-space cutoff, prefactor, box geometry)
//! - [`DerivedTuning`]: Ewald splitting parameter, error estimates and
//!   the tabulated influence function, a pure function of the tunables
//! - [`P3mSolver`]: owns both; implements
//!   [`StateObject`](molsnap_types::StateObject) and only ever exports
//!   the tunables
//!
//! Error estimates are normalized per unit `Q²/√N`, so tuning does not
//! depend on the particle charges.

pub mod params;
pub mod solver;
pub mod tuning;

pub use params::P3mParams;
pub use solver::P3mSolver;
pub use tuning::DerivedTuning;
