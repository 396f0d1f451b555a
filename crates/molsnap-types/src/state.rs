//! The state export/import capability.
//!
//! Every checkpointable subsystem implements [`StateObject`]. The set of
//! subsystem kinds is closed ([`SubsystemId`]), so the checkpoint layer
//! dispatches through an explicit registry instead of probing objects.
//!
//! # Contract
//!
//! ```text
//! export(&self)              -> Payload   pure, never mutates
//! import(&mut self, &Payload) -> ()       all-or-nothing replace
//! ```
//!
//! Implementations decode and validate a complete candidate before
//! touching `self`, so a failed import leaves the prior state intact.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{MolsnapError, MolsnapResult};

/// The closed set of checkpointable subsystem kinds.
///
/// Declaration order is the canonical record order inside a snapshot:
/// the particle system is restored first so later records can be
/// cross-checked against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubsystemId {
    /// Particles, bonds, box geometry.
    ParticleSystem,
    /// Non-bonded pair parameters keyed by type pair.
    InteractionTable,
    /// Stochastic/deterministic temperature coupling.
    Thermostat,
    /// Mesh-based long-range electrostatics (P3M).
    LongRangeSolver,
}

impl SubsystemId {
    /// Returns all subsystem kinds in canonical order.
    pub fn all() -> &'static [SubsystemId] {
        &[
            SubsystemId::ParticleSystem,
            SubsystemId::InteractionTable,
            SubsystemId::Thermostat,
            SubsystemId::LongRangeSolver,
        ]
    }

    /// Stable short name used in logs and record headers.
    pub fn name(&self) -> &'static str {
        match self {
            SubsystemId::ParticleSystem => "system",
            SubsystemId::InteractionTable => "non_bonded_inter",
            SubsystemId::Thermostat => "thermostat",
            SubsystemId::LongRangeSolver => "p3m",
        }
    }

    /// File stem used by the one-file-per-subsystem layout.
    pub fn file_stem(&self) -> &'static str {
        match self {
            SubsystemId::ParticleSystem => "system_save",
            SubsystemId::InteractionTable => "non_bonded_inter_save",
            SubsystemId::Thermostat => "thermostat_save",
            SubsystemId::LongRangeSolver => "p3m_save",
        }
    }

    /// Parses a short name produced by [`SubsystemId::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.name() == name)
    }
}

impl std::fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The exported state of one subsystem.
///
/// `body` is the bincode encoding of a subsystem-specific DTO. The
/// subsystem id and schema version travel with it so a reader can
/// reject mismatched data instead of misinterpreting bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub subsystem: SubsystemId,
    pub schema_version: u32,
    pub body: Vec<u8>,
}

impl Payload {
    /// Encodes a DTO into a payload.
    pub fn encode<T: Serialize>(
        subsystem: SubsystemId,
        schema_version: u32,
        value: &T,
    ) -> MolsnapResult<Self> {
        let body = bincode::serialize(value)?;
        Ok(Self {
            subsystem,
            schema_version,
            body,
        })
    }

    /// Checks id and version, then decodes the body.
    ///
    /// A wrong id or version is a [`MolsnapError::SchemaMismatch`];
    /// undecodable bytes are a [`MolsnapError::Serialization`].
    pub fn decode<T: DeserializeOwned>(
        &self,
        subsystem: SubsystemId,
        schema_version: u32,
    ) -> MolsnapResult<T> {
        if self.subsystem != subsystem {
            return Err(MolsnapError::SchemaMismatch {
                subsystem,
                expected: format!("subsystem '{}'", subsystem),
                found: format!("subsystem '{}'", self.subsystem),
            });
        }
        if self.schema_version != schema_version {
            return Err(MolsnapError::SchemaMismatch {
                subsystem,
                expected: format!("schema v{schema_version}"),
                found: format!("schema v{}", self.schema_version),
            });
        }
        bincode::deserialize(&self.body).map_err(|e| {
            MolsnapError::Serialization(format!("{subsystem} payload body: {e}"))
        })
    }

    /// Size of the encoded body in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A subsystem that can export and import its own state.
pub trait StateObject {
    /// Which subsystem kind this object is.
    fn subsystem(&self) -> SubsystemId;

    /// Schema version written by [`StateObject::export`] and required by
    /// [`StateObject::import`].
    fn schema_version(&self) -> u32;

    /// Captures the current state without side effects.
    ///
    /// Fails with [`MolsnapError::InvalidState`] when the subsystem's own
    /// invariants are violated.
    fn export(&self) -> MolsnapResult<Payload>;

    /// Validates `payload` and, on success, replaces the entire state.
    ///
    /// On failure the prior state is left untouched.
    fn import(&mut self, payload: &Payload) -> MolsnapResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &id in SubsystemId::all() {
            assert_eq!(SubsystemId::from_name(id.name()), Some(id));
        }
        assert_eq!(SubsystemId::from_name("lb_fluid"), None);
    }

    #[test]
    fn canonical_order_starts_with_system() {
        let mut ids = SubsystemId::all().to_vec();
        ids.sort();
        assert_eq!(ids[0], SubsystemId::ParticleSystem);
        assert_eq!(ids, SubsystemId::all());
    }
}
