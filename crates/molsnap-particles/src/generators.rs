//! Procedural particle layouts for samples and testing.
//!
//! Generators are deterministic: the same arguments always produce the
//! same ids, positions and velocities.

use glam::DVec3;
use molsnap_types::MolsnapResult;

use crate::particle::{Particle, UnitSystem};
use crate::system::ParticleSystem;

/// Places `n` particles on a simple cubic lattice inside a cubic box.
///
/// The lattice side is the smallest `k` with `k³ >= n`; sites are filled
/// in x-fastest order with ids `0..n`. Particles are at rest, neutral,
/// unit mass, type 0.
///
/// # Example
/// ```
/// use molsnap_particles::generators::cubic_lattice;
/// let sys = cubic_lattice(10, 10.0).unwrap();
/// assert_eq!(sys.len(), 10);
/// ```
pub fn cubic_lattice(n: usize, box_length: f64) -> MolsnapResult<ParticleSystem> {
    let mut sys = ParticleSystem::new([box_length; 3], UnitSystem::Reduced)?;
    let side = lattice_side(n);
    let spacing = box_length / side as f64;

    for i in 0..n {
        let ix = i % side;
        let iy = (i / side) % side;
        let iz = i / (side * side);
        let position = DVec3::new(
            (ix as f64 + 0.5) * spacing,
            (iy as f64 + 0.5) * spacing,
            (iz as f64 + 0.5) * spacing,
        );
        sys.add_particle(Particle::new(i as u32, position))?;
    }
    Ok(sys)
}

/// Smallest integer `k` with `k³ >= n` (at least 1).
fn lattice_side(n: usize) -> usize {
    let mut k = 1;
    while k * k * k < n {
        k += 1;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_covers_count() {
        assert_eq!(lattice_side(0), 1);
        assert_eq!(lattice_side(8), 2);
        assert_eq!(lattice_side(9), 3);
        assert_eq!(lattice_side(27), 3);
    }
}
