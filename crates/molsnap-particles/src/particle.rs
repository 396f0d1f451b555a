//! Per-particle and per-bond records.
//!
//! These are the array-of-structs view of the particle store. The
//! live [`ParticleSystem`](crate::ParticleSystem) keeps SoA buffers;
//! records are what export produces and import consumes.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use molsnap_types::{BondTypeId, ParticleId, ParticleType};

/// Unit system tag recorded with particle data.
///
/// Positions and velocities are never converted. A snapshot written
/// in one unit system can only be restored into a system using the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    /// Lennard-Jones reduced units (sigma = epsilon = m = 1).
    #[default]
    Reduced,
    /// SI units.
    Si,
}

/// One particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub force: DVec3,
    pub ptype: ParticleType,
    /// Mass, strictly positive.
    pub mass: f64,
    pub charge: f64,
}

impl Particle {
    /// Creates a neutral, unit-mass particle of type 0 at rest.
    pub fn new(id: u32, position: DVec3) -> Self {
        Self {
            id: ParticleId(id),
            position,
            velocity: DVec3::ZERO,
            force: DVec3::ZERO,
            ptype: ParticleType(0),
            mass: 1.0,
            charge: 0.0,
        }
    }

    pub fn with_type(mut self, ptype: u32) -> Self {
        self.ptype = ParticleType(ptype);
        self
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    /// Returns a reason if any field is out of range.
    pub(crate) fn check(&self) -> Result<(), (&'static str, String)> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(("particles.mass", format!("particle {} has mass {}", self.id, self.mass)));
        }
        if !self.position.is_finite() {
            return Err(("particles.position", format!("particle {} has a non-finite position", self.id)));
        }
        if !self.velocity.is_finite() {
            return Err(("particles.velocity", format!("particle {} has a non-finite velocity", self.id)));
        }
        if !self.force.is_finite() {
            return Err(("particles.force", format!("particle {} has a non-finite force", self.id)));
        }
        if !self.charge.is_finite() {
            return Err(("particles.charge", format!("particle {} has a non-finite charge", self.id)));
        }
        Ok(())
    }
}

/// A two-particle bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub bond_type: BondTypeId,
    pub a: ParticleId,
    pub b: ParticleId,
}

impl Bond {
    pub fn new(bond_type: u32, a: u32, b: u32) -> Self {
        Self {
            bond_type: BondTypeId(bond_type),
            a: ParticleId(a),
            b: ParticleId(b),
        }
    }

    /// Returns true if `id` is one of the bond partners.
    #[inline]
    pub fn involves(&self, id: ParticleId) -> bool {
        self.a == id || self.b == id
    }
}
