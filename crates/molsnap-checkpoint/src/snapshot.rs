//! The in-memory snapshot: an ordered set of subsystem payloads.

use std::collections::HashSet;

use molsnap_types::{MolsnapError, MolsnapResult, Payload, SubsystemId};

/// Payloads of one checkpoint, unique per subsystem, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    records: Vec<Payload>,
}

impl Snapshot {
    /// Builds a snapshot, rejecting two payloads for the same subsystem.
    pub fn from_payloads(mut records: Vec<Payload>) -> MolsnapResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().find(|p| !seen.insert(p.subsystem)) {
            return Err(MolsnapError::invalid_state(
                dup.subsystem,
                "more than one record for this subsystem",
            ));
        }
        records.sort_by_key(|p| p.subsystem);
        Ok(Self { records })
    }

    pub fn get(&self, id: SubsystemId) -> Option<&Payload> {
        self.records.iter().find(|p| p.subsystem == id)
    }

    pub fn contains(&self, id: SubsystemId) -> bool {
        self.get(id).is_some()
    }

    /// Subsystem ids present, in canonical order.
    pub fn ids(&self) -> Vec<SubsystemId> {
        self.records.iter().map(|p| p.subsystem).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Payload> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all payload body sizes.
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|p| p.len() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: SubsystemId) -> Payload {
        Payload::encode(id, 1, &0u8).unwrap()
    }

    #[test]
    fn records_sorted_canonically() {
        let snap = Snapshot::from_payloads(vec![
            p(SubsystemId::LongRangeSolver),
            p(SubsystemId::ParticleSystem),
        ])
        .unwrap();
        assert_eq!(
            snap.ids(),
            vec![SubsystemId::ParticleSystem, SubsystemId::LongRangeSolver]
        );
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = Snapshot::from_payloads(vec![p(SubsystemId::Thermostat), p(SubsystemId::Thermostat)])
            .unwrap_err();
        assert!(matches!(err, MolsnapError::InvalidState { .. }));
    }
}
