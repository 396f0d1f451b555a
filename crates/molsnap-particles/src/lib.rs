//! # molsnap-particles
//!
//! Particle storage with Structure-of-Arrays (SoA) layout.
//!
//! ## Key Types
//!
//! - [`ParticleSystem`]: positions, velocities, forces, types, masses,
//!   charges and bonds, plus box geometry and the run clock. Implements
//!   [`StateObject`](molsnap_types::StateObject).
//! - [`Particle`] / [`Bond`]: the per-record view used by export/import.
//! - Procedural generators for samples and tests (cubic lattices).

pub mod generators;
pub mod particle;
pub mod system;

pub use particle::{Bond, Particle, UnitSystem};
pub use system::ParticleSystem;
