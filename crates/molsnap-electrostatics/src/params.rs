//! P3M tunables.
//!
//! Only these values are persisted. Everything the solver derives from
//! them lives in [`DerivedTuning`](crate::tuning::DerivedTuning).

use serde::{Deserialize, Serialize};
use molsnap_types::constants::{MAX_CHARGE_ASSIGNMENT_ORDER, MAX_MESH};
use molsnap_types::{MolsnapError, MolsnapResult, SubsystemId};

const SUBSYSTEM: SubsystemId = SubsystemId::LongRangeSolver;

/// User-set parameters of the mesh solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct P3mParams {
    /// Mesh points per axis.
    pub mesh: [u32; 3],
    /// Charge assignment order (interpolation order), 1..=7.
    pub cao: u32,
    /// Target RMS force error, normalized per unit Q²/√N.
    pub accuracy: f64,
    /// Real-space cutoff.
    pub r_cut: f64,
    /// Coulomb prefactor (Bjerrum length × kT).
    pub prefactor: f64,
    /// Box the mesh spans. Must equal the particle system's box.
    pub box_l: [f64; 3],
}

impl Default for P3mParams {
    fn default() -> Self {
        Self {
            mesh: [8, 8, 8],
            cao: 5,
            accuracy: 1.0e-2,
            r_cut: 3.0,
            prefactor: 1.0,
            box_l: [10.0; 3],
        }
    }
}

impl P3mParams {
    /// Returns a copy with a cubic mesh of `m` points per axis.
    pub fn with_mesh(mut self, m: u32) -> Self {
        self.mesh = [m; 3];
        self
    }

    pub fn with_cao(mut self, cao: u32) -> Self {
        self.cao = cao;
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_box(mut self, box_l: [f64; 3]) -> Self {
        self.box_l = box_l;
        self
    }

    /// Total number of mesh points, or `None` if it overflows `usize`.
    pub fn mesh_size(&self) -> Option<usize> {
        self.mesh
            .iter()
            .try_fold(1usize, |acc, &m| acc.checked_mul(m as usize))
    }

    /// Checks every tunable against its allowed range.
    pub fn validate(&self) -> MolsnapResult<()> {
        if self.mesh.iter().any(|&m| m == 0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "mesh",
                format!("every axis needs at least one mesh point, got {:?}", self.mesh),
            ));
        }
        if self.mesh.iter().any(|&m| m > MAX_MESH) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "mesh",
                format!("at most {MAX_MESH} points per axis, got {:?}", self.mesh),
            ));
        }
        if self.mesh_size().is_none() {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "mesh",
                format!("mesh {:?} has too many points", self.mesh),
            ));
        }
        if !(1..=MAX_CHARGE_ASSIGNMENT_ORDER).contains(&self.cao) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "cao",
                format!("must be in 1..={MAX_CHARGE_ASSIGNMENT_ORDER}, got {}", self.cao),
            ));
        }
        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "accuracy",
                format!("must be > 0, got {}", self.accuracy),
            ));
        }
        if !(self.prefactor.is_finite() && self.prefactor >= 0.0) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "prefactor",
                format!("must be >= 0, got {}", self.prefactor),
            ));
        }
        if self.box_l.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "box_l",
                format!("box lengths must be positive, got {:?}", self.box_l),
            ));
        }
        let half_box = self.box_l.iter().copied().fold(f64::INFINITY, f64::min) / 2.0;
        if !(self.r_cut.is_finite() && self.r_cut > 0.0 && self.r_cut <= half_box) {
            return Err(MolsnapError::validation(
                SUBSYSTEM,
                "r_cut",
                format!("must be in (0, {half_box}], got {}", self.r_cut),
            ));
        }
        Ok(())
    }
}
