//! Build-time capability set.
//!
//! Which optional subsystems and modes this binary was compiled with.
//! The driver consults it before exporting or importing anything that
//! depends on an optional feature.

use serde::Serialize;

/// Names accepted by [`FeatureSet::is_enabled`], in display order.
pub const FEATURE_NAMES: [&str; 5] = ["p3m", "lennard-jones", "langevin", "nose-hoover", "lowe-andersen"];

/// Features compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    pub p3m: bool,
    pub lennard_jones: bool,
    pub langevin: bool,
    pub nose_hoover: bool,
    pub lowe_andersen: bool,
}

impl FeatureSet {
    /// The features of the running binary.
    pub const fn current() -> Self {
        Self {
            p3m: cfg!(feature = "p3m"),
            lennard_jones: cfg!(feature = "lennard-jones"),
            langevin: true,
            nose_hoover: cfg!(feature = "nose-hoover"),
            lowe_andersen: cfg!(feature = "lowe-andersen"),
        }
    }

    /// Looks up a feature by name.
    ///
    /// Case-insensitive; `_` and `-` are interchangeable, so
    /// `"LENNARD_JONES"` and `"lennard-jones"` are the same feature.
    /// Unknown names are reported as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        match normalize(name).as_str() {
            "p3m" => self.p3m,
            "lennard-jones" => self.lennard_jones,
            "langevin" => self.langevin,
            "nose-hoover" => self.nose_hoover,
            "lowe-andersen" => self.lowe_andersen,
            _ => false,
        }
    }

    /// Names of the enabled features.
    pub fn enabled(&self) -> Vec<&'static str> {
        FEATURE_NAMES
            .into_iter()
            .filter(|name| self.is_enabled(name))
            .collect()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::current()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}
