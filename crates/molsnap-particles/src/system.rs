//! Particle system: SoA buffers for all per-particle data.
//!
//! This is the primary mutable data structure during a run. The
//! integrator reads and writes these buffers each step.
//!
//! # Layout
//!
//! All per-particle arrays have the same length and share a slot index.
//! Slot order is an implementation detail (removal swaps slots); the
//! stable identity of a particle is its [`ParticleId`]. The id → slot
//! map is derived data and is rebuilt on import, never stored.

use std::collections::{HashMap, HashSet};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use molsnap_types::{
    MolsnapError, MolsnapResult, ParticleId, ParticleType, Payload, StateObject, SubsystemId,
};

use crate::particle::{Bond, Particle, UnitSystem};

const SUBSYSTEM: SubsystemId = SubsystemId::ParticleSystem;

/// Schema version of the particle system payload.
pub const SCHEMA_VERSION: u32 = 1;

/// Serialized form of the particle system.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SystemRecord {
    units: UnitSystem,
    box_l: [f64; 3],
    periodic: [bool; 3],
    sim_time: f64,
    step: u64,
    /// Ascending by id.
    particles: Vec<Particle>,
    /// Sorted.
    bonds: Vec<Bond>,
}

/// SoA particle store plus box geometry and the run clock.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    units: UnitSystem,
    box_l: [f64; 3],
    periodic: [bool; 3],
    sim_time: f64,
    step: u64,

    // ─── Per-particle (SoA) ───
    ids: Vec<ParticleId>,
    pos: Vec<DVec3>,
    vel: Vec<DVec3>,
    force: Vec<DVec3>,
    ptype: Vec<ParticleType>,
    mass: Vec<f64>,
    charge: Vec<f64>,

    bonds: Vec<Bond>,

    // ─── Derived ───
    index: HashMap<ParticleId, usize>,
}

impl ParticleSystem {
    /// Creates an empty, fully periodic system.
    pub fn new(box_l: [f64; 3], units: UnitSystem) -> MolsnapResult<Self> {
        check_box(&box_l)?;
        Ok(Self {
            units,
            box_l,
            periodic: [true; 3],
            sim_time: 0.0,
            step: 0,
            ids: Vec::new(),
            pos: Vec::new(),
            vel: Vec::new(),
            force: Vec::new(),
            ptype: Vec::new(),
            mass: Vec::new(),
            charge: Vec::new(),
            bonds: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn box_l(&self) -> [f64; 3] {
        self.box_l
    }

    pub fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    pub fn set_periodic(&mut self, periodic: [bool; 3]) {
        self.periodic = periodic;
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Advances the run clock by one step of length `dt`.
    pub fn advance_time(&mut self, dt: f64) {
        self.sim_time += dt;
        self.step += 1;
    }

    /// Adds a particle. Rejects duplicate ids and out-of-range fields.
    pub fn add_particle(&mut self, particle: Particle) -> MolsnapResult<()> {
        if self.index.contains_key(&particle.id) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "particles.id",
                format!("particle {} already exists", particle.id),
            ));
        }
        particle
            .check()
            .map_err(|(field, reason)| MolsnapError::validation(SUBSYSTEM, field, reason))?;
        self.push(particle);
        Ok(())
    }

    fn push(&mut self, p: Particle) {
        self.index.insert(p.id, self.ids.len());
        self.ids.push(p.id);
        self.pos.push(p.position);
        self.vel.push(p.velocity);
        self.force.push(p.force);
        self.ptype.push(p.ptype);
        self.mass.push(p.mass);
        self.charge.push(p.charge);
    }

    /// Removes a particle and every bond that references it.
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle> {
        let slot = self.index.remove(&id)?;
        let removed = self.particle_at(slot);
        let last = self.ids.len() - 1;

        self.ids.swap_remove(slot);
        self.pos.swap_remove(slot);
        self.vel.swap_remove(slot);
        self.force.swap_remove(slot);
        self.ptype.swap_remove(slot);
        self.mass.swap_remove(slot);
        self.charge.swap_remove(slot);

        if slot != last {
            self.index.insert(self.ids[slot], slot);
        }
        self.bonds.retain(|b| !b.involves(id));
        Some(removed)
    }

    /// Adds a bond between two existing, distinct particles.
    pub fn add_bond(&mut self, bond: Bond) -> MolsnapResult<()> {
        check_bond(&bond, |id| self.index.contains_key(&id))?;
        self.bonds.push(bond);
        Ok(())
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Returns true if a particle with this id exists.
    pub fn contains(&self, id: ParticleId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns a copy of the particle with this id.
    pub fn particle(&self, id: ParticleId) -> Option<Particle> {
        self.index.get(&id).map(|&slot| self.particle_at(slot))
    }

    fn particle_at(&self, slot: usize) -> Particle {
        Particle {
            id: self.ids[slot],
            position: self.pos[slot],
            velocity: self.vel[slot],
            force: self.force[slot],
            ptype: self.ptype[slot],
            mass: self.mass[slot],
            charge: self.charge[slot],
        }
    }

    /// All particle ids in ascending order.
    pub fn ids(&self) -> Vec<ParticleId> {
        let mut ids = self.ids.clone();
        ids.sort_unstable();
        ids
    }

    /// All particles in ascending id order.
    pub fn particles(&self) -> Vec<Particle> {
        let mut slots: Vec<usize> = (0..self.ids.len()).collect();
        slots.sort_unstable_by_key(|&s| self.ids[s]);
        slots.into_iter().map(|s| self.particle_at(s)).collect()
    }

    /// Sets the position of particle `id`.
    pub fn set_position(&mut self, id: ParticleId, position: DVec3) -> MolsnapResult<()> {
        let slot = self.slot(id)?;
        self.pos[slot] = position;
        Ok(())
    }

    /// Sets the velocity of particle `id`.
    pub fn set_velocity(&mut self, id: ParticleId, velocity: DVec3) -> MolsnapResult<()> {
        let slot = self.slot(id)?;
        self.vel[slot] = velocity;
        Ok(())
    }

    /// Sets the force on particle `id`.
    pub fn set_force(&mut self, id: ParticleId, force: DVec3) -> MolsnapResult<()> {
        let slot = self.slot(id)?;
        self.force[slot] = force;
        Ok(())
    }

    fn slot(&self, id: ParticleId) -> MolsnapResult<usize> {
        self.index.get(&id).copied().ok_or_else(|| {
            MolsnapError::validation(SUBSYSTEM, "particles.id", format!("no particle {id}"))
        })
    }

    // ─── Slot-ordered buffers for integrators ───

    pub fn positions(&self) -> &[DVec3] {
        &self.pos
    }

    pub fn positions_mut(&mut self) -> &mut [DVec3] {
        &mut self.pos
    }

    pub fn velocities(&self) -> &[DVec3] {
        &self.vel
    }

    pub fn velocities_mut(&mut self) -> &mut [DVec3] {
        &mut self.vel
    }

    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    /// Wraps positions back into the box along periodic axes.
    pub fn fold_positions(&mut self) {
        for p in &mut self.pos {
            for axis in 0..3 {
                if self.periodic[axis] {
                    p[axis] = p[axis].rem_euclid(self.box_l[axis]);
                }
            }
        }
    }

    /// Total kinetic energy: 0.5 * Σ m_i * |v_i|².
    pub fn kinetic_energy(&self) -> f64 {
        self.vel
            .iter()
            .zip(&self.mass)
            .map(|(v, &m)| 0.5 * m * v.length_squared())
            .sum()
    }

    /// Number of charged particles and the sum of squared charges.
    pub fn charge_summary(&self) -> (usize, f64) {
        self.charge
            .iter()
            .filter(|q| **q != 0.0)
            .fold((0, 0.0), |(n, q2), q| (n + 1, q2 + q * q))
    }

    /// Validates internal consistency.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - The id index maps every id to its own slot, with no duplicates
    /// - Every bond references two distinct existing particles
    pub fn validate(&self) -> MolsnapResult<()> {
        let n = self.ids.len();
        let lengths = [
            self.pos.len(),
            self.vel.len(),
            self.force.len(),
            self.ptype.len(),
            self.mass.len(),
            self.charge.len(),
        ];
        if lengths.iter().any(|&l| l != n) {
            return Err(MolsnapError::invalid_state(
                SUBSYSTEM,
                "per-particle arrays have inconsistent lengths",
            ));
        }
        if self.index.len() != n {
            return Err(MolsnapError::invalid_state(
                SUBSYSTEM,
                format!("id index holds {} entries for {} particles", self.index.len(), n),
            ));
        }
        for (slot, id) in self.ids.iter().enumerate() {
            if self.index.get(id) != Some(&slot) {
                return Err(MolsnapError::invalid_state(
                    SUBSYSTEM,
                    format!("id index is stale for particle {id}"),
                ));
            }
        }
        for bond in &self.bonds {
            check_bond(bond, |id| self.index.contains_key(&id))
                .map_err(|e| MolsnapError::invalid_state(SUBSYSTEM, e.to_string()))?;
        }
        Ok(())
    }
}

impl StateObject for ParticleSystem {
    fn subsystem(&self) -> SubsystemId {
        SUBSYSTEM
    }

    fn schema_version(&self) -> u32 {
        SCHEMA_VERSION
    }

    fn export(&self) -> MolsnapResult<Payload> {
        self.validate()?;
        let mut bonds = self.bonds.clone();
        bonds.sort_unstable();
        let record = SystemRecord {
            units: self.units,
            box_l: self.box_l,
            periodic: self.periodic,
            sim_time: self.sim_time,
            step: self.step,
            particles: self.particles(),
            bonds,
        };
        Payload::encode(SUBSYSTEM, SCHEMA_VERSION, &record)
    }

    fn import(&mut self, payload: &Payload) -> MolsnapResult<()> {
        let record: SystemRecord = payload.decode(SUBSYSTEM, SCHEMA_VERSION)?;

        if record.units != self.units {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "units",
                format!("snapshot uses {:?}, live system uses {:?}", record.units, self.units),
            ));
        }
        check_box(&record.box_l)?;
        if !(record.sim_time.is_finite() && record.sim_time >= 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "sim_time",
                format!("{} is not a valid simulation time", record.sim_time),
            ));
        }

        let mut seen = HashSet::with_capacity(record.particles.len());
        for p in &record.particles {
            if !seen.insert(p.id) {
                return Err(MolsnapError::validation(
                    SUBSYSTEM,
                    "particles.id",
                    format!("duplicate particle {}", p.id),
                ));
            }
            p.check()
                .map_err(|(field, reason)| MolsnapError::validation(SUBSYSTEM, field, reason))?;
        }
        for bond in &record.bonds {
            check_bond(bond, |id| seen.contains(&id))?;
        }

        // Candidate is valid: rebuild from scratch and swap in.
        let mut fresh = ParticleSystem::new(record.box_l, record.units)?;
        fresh.periodic = record.periodic;
        fresh.sim_time = record.sim_time;
        fresh.step = record.step;
        for p in record.particles {
            fresh.push(p);
        }
        fresh.bonds = record.bonds;

        tracing::debug!(
            particles = fresh.len(),
            bonds = fresh.bonds.len(),
            "particle system imported"
        );
        *self = fresh;
        Ok(())
    }
}

fn check_box(box_l: &[f64; 3]) -> MolsnapResult<()> {
    if box_l.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
        return Err(MolsnapError::validation(
            SUBSYSTEM,
            "box_l",
            format!("box lengths must be positive, got {box_l:?}"),
        ));
    }
    Ok(())
}

fn check_bond(bond: &Bond, exists: impl Fn(ParticleId) -> bool) -> MolsnapResult<()> {
    if bond.a == bond.b {
        return Err(MolsnapError::validation(
            SUBSYSTEM,
            "bonds",
            format!("bond binds particle {} to itself", bond.a),
        ));
    }
    for id in [bond.a, bond.b] {
        if !exists(id) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "bonds",
                format!("bond references missing particle {id}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_keeps_index_consistent() {
        let mut sys = ParticleSystem::new([5.0; 3], UnitSystem::Reduced).unwrap();
        for i in 0..4 {
            sys.add_particle(Particle::new(i, DVec3::splat(i as f64))).unwrap();
        }
        sys.add_bond(Bond::new(0, 0, 3)).unwrap();
        sys.add_bond(Bond::new(0, 1, 2)).unwrap();

        let removed = sys.remove_particle(ParticleId(0)).unwrap();
        assert_eq!(removed.position, DVec3::ZERO);
        assert!(sys.validate().is_ok());
        assert_eq!(sys.bonds().len(), 1);
        assert_eq!(sys.particle(ParticleId(3)).unwrap().position, DVec3::splat(3.0));
    }
}
