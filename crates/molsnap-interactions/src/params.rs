//! Lennard-Jones pair parameters.
//!
//! ```text
//! V(r) = 4ε [ (σ/(r-r_off))¹² - (σ/(r-r_off))⁶ + shift ]   for r - r_off < r_cut
//! V(r) = 0                                                  otherwise
//! ```

use serde::{Deserialize, Serialize};

/// Parameters of one Lennard-Jones pair interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LennardJones {
    /// Well depth ε (energy). Zero means non-interacting.
    pub epsilon: f64,
    /// Particle diameter σ (length), strictly positive when active.
    pub sigma: f64,
    /// Cutoff distance, measured from the offset.
    pub cutoff: f64,
    /// Energy shift in units of 4ε.
    pub shift: f64,
    /// Radial offset r_off, non-negative.
    pub offset: f64,
}

impl LennardJones {
    /// Creates a pair with zero shift and offset.
    pub fn new(epsilon: f64, sigma: f64, cutoff: f64) -> Self {
        Self {
            epsilon,
            sigma,
            cutoff,
            shift: 0.0,
            offset: 0.0,
        }
    }

    /// The non-interacting entry returned for unconfigured pairs.
    pub fn inactive() -> Self {
        Self {
            epsilon: 0.0,
            sigma: 0.0,
            cutoff: 0.0,
            shift: 0.0,
            offset: 0.0,
        }
    }

    /// Returns true if this entry produces any force.
    pub fn is_active(&self) -> bool {
        self.epsilon > 0.0 && self.cutoff > 0.0
    }

    /// Sets the shift so the potential is zero at the cutoff.
    pub fn with_auto_shift(mut self) -> Self {
        let sr6 = (self.sigma / self.cutoff).powi(6);
        self.shift = sr6 - sr6 * sr6;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Potential energy at center distance `r`.
    pub fn energy(&self, r: f64) -> f64 {
        let d = r - self.offset;
        if !self.is_active() || d >= self.cutoff || d <= 0.0 {
            return 0.0;
        }
        let sr6 = (self.sigma / d).powi(6);
        4.0 * self.epsilon * (sr6 * sr6 - sr6 + self.shift)
    }

    /// Returns the first offending field and the reason, if any.
    pub fn check(&self) -> Result<(), (&'static str, String)> {
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(("epsilon", format!("must be >= 0, got {}", self.epsilon)));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(("sigma", format!("must be > 0, got {}", self.sigma)));
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(("cutoff", format!("must be > 0, got {}", self.cutoff)));
        }
        if !self.shift.is_finite() {
            return Err(("shift", "must be finite".to_string()));
        }
        if !(self.offset.is_finite() && self.offset >= 0.0) {
            return Err(("offset", format!("must be >= 0, got {}", self.offset)));
        }
        Ok(())
    }
}

impl Default for LennardJones {
    fn default() -> Self {
        Self::inactive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_shift_zeroes_energy_at_cutoff() {
        let lj = LennardJones::new(1.0, 1.0, 2.5).with_auto_shift();
        assert!(lj.energy(2.5 - 1e-12).abs() < 1e-9);
    }

    #[test]
    fn minimum_at_two_to_one_sixth() {
        let lj = LennardJones::new(1.0, 1.0, 2.5);
        let r_min = 2f64.powf(1.0 / 6.0);
        assert!((lj.energy(r_min) + 1.0).abs() < 1e-12);
    }
}
