//! Thermostat modes and their build-time availability.

use serde::{Deserialize, Serialize};

/// Which thermostat couples the system to the heat bath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThermostatMode {
    /// No coupling; velocities evolve deterministically.
    #[default]
    Off,
    /// Friction plus uniform random kicks per particle.
    Langevin,
    /// Deterministic extended-system thermostat.
    NoseHoover,
    /// Pairwise stochastic velocity exchange; conserves momentum.
    LoweAndersen,
}

impl ThermostatMode {
    pub fn all() -> [ThermostatMode; 4] {
        [Self::Off, Self::Langevin, Self::NoseHoover, Self::LoweAndersen]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Langevin => "langevin",
            Self::NoseHoover => "nose-hoover",
            Self::LoweAndersen => "lowe-andersen",
        }
    }

    /// Cargo feature that has to be enabled for this mode, if any.
    pub fn required_feature(&self) -> Option<&'static str> {
        match self {
            Self::Off | Self::Langevin => None,
            Self::NoseHoover => Some("nose-hoover"),
            Self::LoweAndersen => Some("lowe-andersen"),
        }
    }

    /// Returns true if this build can run the mode.
    pub fn is_compiled(&self) -> bool {
        match self {
            Self::Off | Self::Langevin => true,
            Self::NoseHoover => cfg!(feature = "nose-hoover"),
            Self::LoweAndersen => cfg!(feature = "lowe-andersen"),
        }
    }

    /// Returns true if the mode draws random numbers.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::Langevin | Self::LoweAndersen)
    }
}

impl std::fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn langevin_always_compiled() {
        assert!(ThermostatMode::Off.is_compiled());
        assert!(ThermostatMode::Langevin.is_compiled());
        assert_eq!(ThermostatMode::Langevin.required_feature(), None);
    }

    #[test]
    fn only_langevin_and_lowe_andersen_are_stochastic() {
        let stochastic: Vec<_> = ThermostatMode::all()
            .into_iter()
            .filter(|m| m.is_stochastic())
            .collect();
        assert_eq!(stochastic, vec![ThermostatMode::Langevin, ThermostatMode::LoweAndersen]);
    }
}
