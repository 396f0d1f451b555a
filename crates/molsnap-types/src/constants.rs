//! Simulation defaults shared across subsystems.

/// Default integration time step (reduced units).
pub const DEFAULT_TIME_STEP: f64 = 0.01;

/// Default Lennard-Jones cutoff in units of sigma (WCA minimum).
pub const WCA_CUTOFF_FACTOR: f64 = 1.122_462_048_309_373;

/// Largest supported charge assignment order for the mesh solver.
pub const MAX_CHARGE_ASSIGNMENT_ORDER: u32 = 7;

/// Largest mesh size per axis the P3M tuner accepts.
pub const MAX_MESH: u32 = 256;

/// Relative threshold below which an aliasing-sum contribution is dropped.
pub const ROUND_ERROR_PREC: f64 = 1.0e-14;

/// Epsilon for floating-point comparisons of geometry (box lengths).
pub const EPSILON: f64 = 1.0e-12;
