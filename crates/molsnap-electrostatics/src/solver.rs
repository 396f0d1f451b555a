//! P3M long-range solver state.
//!
//! The snapshot holds only [`P3mParams`]. On import the solver validates
//! the tunables and recomputes its [`DerivedTuning`] before anything is
//! swapped in, so a failed import leaves the previous solver intact.

use molsnap_types::{MolsnapResult, Payload, StateObject, SubsystemId};

use crate::params::P3mParams;
use crate::tuning::{self, DerivedTuning};

const SUBSYSTEM: SubsystemId = SubsystemId::LongRangeSolver;

/// Schema version of the P3M payload.
pub const SCHEMA_VERSION: u32 = 1;

/// Tuned P3M solver: tunables plus everything derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct P3mSolver {
    params: P3mParams,
    tuning: DerivedTuning,
}

impl P3mSolver {
    /// Validates and tunes `params`.
    pub fn new(params: P3mParams) -> MolsnapResult<Self> {
        let tuning = tuning::tune(&params)?;
        tracing::info!(
            mesh = ?params.mesh,
            cao = params.cao,
            alpha = tuning.alpha,
            "p3m solver initialized"
        );
        Ok(Self { params, tuning })
    }

    /// Builds a solver directly from an exported payload.
    pub fn from_payload(payload: &Payload) -> MolsnapResult<Self> {
        let params: P3mParams = payload.decode(SUBSYSTEM, SCHEMA_VERSION)?;
        Self::new(params)
    }

    /// Replaces the tunables, retuning first. On error nothing changes.
    pub fn set_params(&mut self, params: P3mParams) -> MolsnapResult<()> {
        let tuning = tuning::tune(&params)?;
        self.params = params;
        self.tuning = tuning;
        Ok(())
    }

    pub fn params(&self) -> &P3mParams {
        &self.params
    }

    pub fn tuning(&self) -> &DerivedTuning {
        &self.tuning
    }

    pub fn box_l(&self) -> [f64; 3] {
        self.params.box_l
    }

    /// Coulomb self-energy `-prefactor · α/√π · Σ q²`.
    pub fn self_energy(&self, charges: &[f64]) -> f64 {
        let sum_q2: f64 = charges.iter().map(|q| q * q).sum();
        -self.params.prefactor * self.tuning.alpha / std::f64::consts::PI.sqrt() * sum_q2
    }
}

impl StateObject for P3mSolver {
    fn subsystem(&self) -> SubsystemId {
        SUBSYSTEM
    }

    fn schema_version(&self) -> u32 {
        SCHEMA_VERSION
    }

    fn export(&self) -> MolsnapResult<Payload> {
        Payload::encode(SUBSYSTEM, SCHEMA_VERSION, &self.params)
    }

    fn import(&mut self, payload: &Payload) -> MolsnapResult<()> {
        let params: P3mParams = payload.decode(SUBSYSTEM, SCHEMA_VERSION)?;
        self.set_params(params)?;
        tracing::debug!(alpha = self.tuning.alpha, "p3m state imported and retuned");
        Ok(())
    }
}
