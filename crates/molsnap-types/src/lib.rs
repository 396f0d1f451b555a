//! # molsnap-types
//!
//! Shared identifiers, error types, physical defaults, and the
//! [`StateObject`] capability for the molsnap simulation core.
//!
//! This crate has no domain logic. It defines the vocabulary that
//! every subsystem crate and the checkpoint layer share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod state;

pub use error::{MolsnapError, MolsnapResult};
pub use ids::{BondTypeId, ParticleId, ParticleType};
pub use state::{Payload, StateObject, SubsystemId};
