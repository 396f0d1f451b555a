//! Time integration interface.
//!
//! Force calculation is not part of this workspace; integrators here
//! only move particles and apply the thermostat, which is enough to
//! advance state between checkpoints.

use glam::DVec3;
use molsnap_particles::ParticleSystem;
use molsnap_thermostat::{Thermostat, ThermostatMode};
use molsnap_types::{MolsnapError, MolsnapResult, SubsystemId};

/// Advances a particle system by one time step.
///
/// The step length is the thermostat's `time_step`, so the noise
/// amplitude and the integration step always agree.
pub trait Integrator {
    fn name(&self) -> &str;

    fn step(&mut self, system: &mut ParticleSystem, thermostat: &mut Thermostat) -> MolsnapResult<()>;
}

/// Force-free Euler stepper with thermostat coupling.
///
/// Per step: Nosé–Hoover rescale, Langevin kick on each velocity,
/// drift `x += v dt`, Lowe–Andersen collisions within `pair_cutoff`,
/// fold into the box, advance the clock. Particles are visited in
/// ascending id order so a restored system draws the same noise.
#[derive(Debug, Clone)]
pub struct FreeFlight {
    pair_cutoff: f64,
}

impl FreeFlight {
    pub fn new() -> Self {
        Self { pair_cutoff: 1.0 }
    }

    /// Sets the Lowe–Andersen collision range.
    pub fn with_pair_cutoff(mut self, cutoff: f64) -> Self {
        self.pair_cutoff = cutoff;
        self
    }
}

impl Default for FreeFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for FreeFlight {
    fn name(&self) -> &str {
        "free_flight"
    }

    fn step(&mut self, system: &mut ParticleSystem, thermostat: &mut Thermostat) -> MolsnapResult<()> {
        let dt = thermostat.config().time_step;

        if thermostat.mode() == ThermostatMode::NoseHoover {
            let scale = thermostat.nose_hoover_update(system.kinetic_energy(), 3 * system.len());
            for v in system.velocities_mut() {
                *v *= scale;
            }
        }

        let ids = system.ids();
        for &id in &ids {
            let p = system.particle(id).ok_or_else(|| {
                MolsnapError::invalid_state(SubsystemId::ParticleSystem, format!("particle {id} vanished"))
            })?;
            let kick = thermostat.langevin_force(p.velocity, p.mass);
            let velocity = p.velocity + kick / p.mass * dt;
            system.set_velocity(id, velocity)?;
            system.set_position(id, p.position + velocity * dt)?;
        }

        if thermostat.mode() == ThermostatMode::LoweAndersen {
            self.collide_pairs(system, thermostat, &ids)?;
        }

        system.fold_positions();
        system.advance_time(dt);
        Ok(())
    }
}

impl FreeFlight {
    fn collide_pairs(
        &self,
        system: &mut ParticleSystem,
        thermostat: &mut Thermostat,
        ids: &[molsnap_types::ParticleId],
    ) -> MolsnapResult<()> {
        let box_l = DVec3::from_array(system.box_l());
        let periodic = system.periodic();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let (Some(pa), Some(pb)) = (system.particle(a), system.particle(b)) else {
                    continue;
                };
                let separation = minimum_image(pa.position - pb.position, box_l, periodic);
                if separation.length() > self.pair_cutoff {
                    continue;
                }
                if let Some((va, vb)) = thermostat.lowe_andersen_collision(
                    (pa.velocity, pa.mass),
                    (pb.velocity, pb.mass),
                    separation,
                ) {
                    system.set_velocity(a, va)?;
                    system.set_velocity(b, vb)?;
                }
            }
        }
        Ok(())
    }
}

fn minimum_image(mut d: DVec3, box_l: DVec3, periodic: [bool; 3]) -> DVec3 {
    for axis in 0..3 {
        if periodic[axis] {
            d[axis] -= box_l[axis] * (d[axis] / box_l[axis]).round();
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_image_wraps_periodic_axes() {
        let d = minimum_image(DVec3::new(9.0, 9.0, 0.0), DVec3::splat(10.0), [true, false, true]);
        assert_eq!(d, DVec3::new(-1.0, 9.0, 0.0));
    }
}
