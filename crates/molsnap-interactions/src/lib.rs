//! # molsnap-interactions
//!
//! Non-bonded pair parameters keyed by unordered particle-type pairs.
//!
//! ## Design
//!
//! The [`InteractionTable`] stores only explicitly configured pairs
//! under a normalized [`TypePair`] key, so `(a, b)` and `(b, a)` always
//! resolve to the same entry. Unconfigured pairs read as the inactive
//! (non-interacting) default.
//!
//! [`InteractionPresets`] stores named Lennard-Jones presets that
//! can be looked up when configuring a table.

pub mod params;
pub mod presets;
pub mod table;

pub use params::LennardJones;
pub use presets::InteractionPresets;
pub use table::{InteractionTable, TypePair};
