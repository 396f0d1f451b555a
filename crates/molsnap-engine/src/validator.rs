//! Configuration validation.
//!
//! Checks a [`SimulationConfig`] before anything is built from it, so
//! problems are reported with the config section that caused them.

use molsnap_interactions::InteractionPresets;
use molsnap_types::{MolsnapError, MolsnapResult};

use crate::config::SimulationConfig;

/// Validates a complete simulation config.
///
/// Checks:
/// - Particle count, box length and type count are usable
/// - Every pair names exactly one of `preset` / `params`, and the
///   preset exists
/// - Thermostat and P3M parameters are in range
pub fn validate_config(config: &SimulationConfig) -> MolsnapResult<()> {
    let particles = &config.particles;
    if particles.count == 0 {
        return Err(MolsnapError::InvalidConfig(
            "particles.count must be >= 1".into(),
        ));
    }
    if !(particles.box_length.is_finite() && particles.box_length > 0.0) {
        return Err(MolsnapError::InvalidConfig(format!(
            "particles.box_length must be positive, got {}",
            particles.box_length
        )));
    }
    if !particles.charge.is_finite() {
        return Err(MolsnapError::InvalidConfig(
            "particles.charge must be finite".into(),
        ));
    }
    if particles.types == 0 {
        return Err(MolsnapError::InvalidConfig(
            "particles.types must be >= 1".into(),
        ));
    }

    let presets = InteractionPresets::with_defaults();
    for (i, pair) in config.pairs.iter().enumerate() {
        match (&pair.preset, &pair.params) {
            (Some(name), None) => {
                if presets.get(name).is_none() {
                    return Err(MolsnapError::InvalidConfig(format!(
                        "pairs[{i}]: unknown preset '{name}'. Available: {}",
                        presets.names().join(", ")
                    )));
                }
            }
            (None, Some(params)) => {
                params.check().map_err(|(field, reason)| {
                    MolsnapError::InvalidConfig(format!("pairs[{i}].params.{field}: {reason}"))
                })?;
            }
            _ => {
                return Err(MolsnapError::InvalidConfig(format!(
                    "pairs[{i}]: set exactly one of 'preset' or 'params'"
                )));
            }
        }
    }

    config
        .thermostat
        .validate()
        .map_err(|e| MolsnapError::InvalidConfig(format!("thermostat: {e}")))?;

    if let Some(params) = config.p3m_params() {
        params
            .validate()
            .map_err(|e| MolsnapError::InvalidConfig(format!("p3m: {e}")))?;
        if particles.charge == 0.0 {
            tracing::warn!("p3m configured for a neutral system");
        }
    }

    if config.thermostat.mode.is_stochastic() && config.seed.is_none() {
        tracing::warn!(
            "stochastic thermostat without a seed; checkpoints will not reproduce the noise"
        );
    }

    Ok(())
}
