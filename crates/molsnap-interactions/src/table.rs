//! Sparse, symmetric non-bonded interaction table.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use molsnap_types::{MolsnapError, MolsnapResult, ParticleType, Payload, StateObject, SubsystemId};

use crate::params::LennardJones;

const SUBSYSTEM: SubsystemId = SubsystemId::InteractionTable;

/// Schema version of the interaction table payload.
pub const SCHEMA_VERSION: u32 = 1;

/// Unordered pair of particle types, stored as `(lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypePair {
    lo: u32,
    hi: u32,
}

impl TypePair {
    /// Normalizes the pair so `new(a, b) == new(b, a)`.
    pub fn new(a: ParticleType, b: ParticleType) -> Self {
        let (lo, hi) = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
        Self { lo, hi }
    }

    pub fn types(&self) -> (ParticleType, ParticleType) {
        (ParticleType(self.lo), ParticleType(self.hi))
    }

    fn is_normalized(&self) -> bool {
        self.lo <= self.hi
    }
}

/// One exported entry, in the order the pair was stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Entry {
    type_a: u32,
    type_b: u32,
    params: LennardJones,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableRecord {
    max_seen_type: Option<u32>,
    entries: Vec<Entry>,
}

/// Non-bonded parameters for explicitly configured type pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTable {
    pairs: BTreeMap<TypePair, LennardJones>,
    /// Highest particle type the table has been sized for.
    max_seen_type: Option<u32>,
}

impl InteractionTable {
    /// Creates an empty table (every pair non-interacting).
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the pair `(a, b)`; `(b, a)` resolves to the same entry.
    pub fn set(&mut self, a: ParticleType, b: ParticleType, params: LennardJones) -> MolsnapResult<()> {
        params
            .check()
            .map_err(|(field, reason)| MolsnapError::validation(SUBSYSTEM, field, reason))?;
        self.make_type_exist(a.0.max(b.0));
        self.pairs.insert(TypePair::new(a, b), params);
        Ok(())
    }

    /// Returns the parameters for `(a, b)`, or the inactive default.
    pub fn get(&self, a: ParticleType, b: ParticleType) -> LennardJones {
        self.pairs
            .get(&TypePair::new(a, b))
            .copied()
            .unwrap_or_else(LennardJones::inactive)
    }

    /// Returns true if `(a, b)` was explicitly configured.
    pub fn is_configured(&self, a: ParticleType, b: ParticleType) -> bool {
        self.pairs.contains_key(&TypePair::new(a, b))
    }

    /// Resets `(a, b)` to the inactive default.
    pub fn clear(&mut self, a: ParticleType, b: ParticleType) -> Option<LennardJones> {
        self.pairs.remove(&TypePair::new(a, b))
    }

    /// Configured pairs in ascending key order.
    pub fn configured_pairs(&self) -> Vec<TypePair> {
        self.pairs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn max_seen_type(&self) -> Option<u32> {
        self.max_seen_type
    }

    /// Grows the table to cover particle types up to `ptype`.
    pub fn make_type_exist(&mut self, ptype: u32) {
        self.max_seen_type = Some(self.max_seen_type.map_or(ptype, |m| m.max(ptype)));
    }

    /// Largest active cutoff (including offset) over all pairs.
    pub fn max_cutoff(&self) -> f64 {
        self.pairs
            .values()
            .filter(|p| p.is_active())
            .map(|p| p.cutoff + p.offset)
            .fold(0.0, f64::max)
    }
}

/// Checks that no unordered pair appears twice.
fn find_duplicate(entries: &[Entry]) -> Option<TypePair> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .map(|e| TypePair::new(ParticleType(e.type_a), ParticleType(e.type_b)))
        .find(|pair| !seen.insert(*pair))
}

impl StateObject for InteractionTable {
    fn subsystem(&self) -> SubsystemId {
        SUBSYSTEM
    }

    fn schema_version(&self) -> u32 {
        SCHEMA_VERSION
    }

    fn export(&self) -> MolsnapResult<Payload> {
        let entries: Vec<Entry> = self
            .pairs
            .iter()
            .map(|(pair, params)| Entry {
                type_a: pair.lo,
                type_b: pair.hi,
                params: *params,
            })
            .collect();

        if let Some(bad) = self.pairs.keys().find(|p| !p.is_normalized()) {
            return Err(MolsnapError::invalid_state(
                SUBSYSTEM,
                format!("pair key {bad:?} is not normalized"),
            ));
        }
        if let Some(dup) = find_duplicate(&entries) {
            return Err(MolsnapError::invalid_state(
                SUBSYSTEM,
                format!("pair {dup:?} would be emitted twice"),
            ));
        }

        let record = TableRecord {
            max_seen_type: self.max_seen_type,
            entries,
        };
        Payload::encode(SUBSYSTEM, SCHEMA_VERSION, &record)
    }

    fn import(&mut self, payload: &Payload) -> MolsnapResult<()> {
        let record: TableRecord = payload.decode(SUBSYSTEM, SCHEMA_VERSION)?;

        if let Some(dup) = find_duplicate(&record.entries) {
            let (a, b) = dup.types();
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "entries",
                format!("pair ({}, {}) listed more than once", a.0, b.0),
            ));
        }

        let mut fresh = InteractionTable::new();
        if let Some(max) = record.max_seen_type {
            fresh.make_type_exist(max);
        }
        for entry in record.entries {
            fresh.set(ParticleType(entry.type_a), ParticleType(entry.type_b), entry.params)?;
        }
        if fresh.max_seen_type != record.max_seen_type {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "max_seen_type",
                format!(
                    "entries reference type {:?} beyond recorded maximum {:?}",
                    fresh.max_seen_type, record.max_seen_type
                ),
            ));
        }

        tracing::debug!(pairs = fresh.len(), "interaction table imported");
        *self = fresh;
        Ok(())
    }
}
