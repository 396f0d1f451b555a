//! Named Lennard-Jones presets.
//!
//! Presets are looked up by name (e.g., "wca", "lj_cut") when a sample
//! or config file configures a type pair. Custom presets can be
//! registered at runtime.

use std::collections::HashMap;

use molsnap_types::constants::WCA_CUTOFF_FACTOR;

use crate::params::LennardJones;

/// A named collection of pair-parameter presets.
#[derive(Debug, Clone)]
pub struct InteractionPresets {
    presets: HashMap<String, LennardJones>,
}

impl InteractionPresets {
    /// Creates a collection with the built-in presets.
    pub fn with_defaults() -> Self {
        let mut db = Self::empty();
        db.register("wca", wca());
        db.register("lj_cut", lj_cut());
        db.register("lj_soft", lj_soft());
        db
    }

    pub fn empty() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    /// Registers a preset. Overwrites if the name already exists.
    pub fn register(&mut self, name: &str, params: LennardJones) {
        self.presets.insert(name.to_string(), params);
    }

    /// Looks up a preset by name.
    pub fn get(&self, name: &str) -> Option<&LennardJones> {
        self.presets.get(name)
    }

    /// Returns all preset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for InteractionPresets {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ─── Built-in Presets ─────────────────────────────────────────────────

/// Purely repulsive Weeks–Chandler–Andersen pair, cut at the minimum.
fn wca() -> LennardJones {
    LennardJones::new(1.0, 1.0, WCA_CUTOFF_FACTOR).with_auto_shift()
}

/// Standard truncated and shifted LJ at 2.5σ.
fn lj_cut() -> LennardJones {
    LennardJones::new(1.0, 1.0, 2.5).with_auto_shift()
}

/// Weak attraction, used for the sample system.
fn lj_soft() -> LennardJones {
    LennardJones::new(0.5, 1.0, 2.0).with_auto_shift()
}
