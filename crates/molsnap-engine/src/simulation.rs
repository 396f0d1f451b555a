//! The simulation driver.
//!
//! Owns every subsystem and is the only thing that checkpoints or
//! restores them. All mutating calls take `&mut self`, so stepping can
//! never interleave with a checkpoint or restore.
//!
//! # Restore rules
//!
//! - `system`, `non_bonded_inter` and `thermostat` records are mandatory.
//! - A `p3m` record is optional; without one the restored driver has no
//!   solver. With one, its box must match the restored particle box.
//! - Problems found before any import (unreadable files, missing
//!   records, features not compiled in) leave the driver untouched.
//! - A rejection during import leaves some subsystems replaced and
//!   others not; the driver is then [`Status::Unsafe`] and refuses to
//!   step or checkpoint until [`Simulation::reset`] or a successful
//!   restore.

use std::path::Path;

use molsnap_checkpoint::{
    CheckpointReader, CheckpointWriter, Layout, RestoreOutcome, Snapshot,
};
use molsnap_electrostatics::{solver, P3mParams, P3mSolver};
use molsnap_interactions::{InteractionPresets, InteractionTable};
use molsnap_particles::generators::cubic_lattice;
use molsnap_particles::ParticleSystem;
use molsnap_telemetry::{CheckpointEvent, EventBus, EventKind, EventSink};
use molsnap_thermostat::Thermostat;
use molsnap_types::{
    MolsnapError, MolsnapResult, ParticleType, Payload, StateObject, SubsystemId,
};

use crate::config::SimulationConfig;
use crate::features::FeatureSet;
use crate::integrator::Integrator;
use crate::validator::validate_config;

/// Records a restore cannot do without.
const MANDATORY: [SubsystemId; 3] = [
    SubsystemId::ParticleSystem,
    SubsystemId::InteractionTable,
    SubsystemId::Thermostat,
];

/// Whether the driver's subsystems are mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    /// A restore stopped part-way; `failed` rejected its record.
    Unsafe { failed: SubsystemId },
}

/// Owner of all checkpointable subsystems.
#[derive(Debug)]
pub struct Simulation {
    system: ParticleSystem,
    interactions: InteractionTable,
    thermostat: Thermostat,
    solver: Option<P3mSolver>,
    features: FeatureSet,
    status: Status,
    events: EventBus,
}

impl Simulation {
    /// Assembles a driver from already-built subsystems, without a solver.
    pub fn new(system: ParticleSystem, interactions: InteractionTable, thermostat: Thermostat) -> Self {
        Self {
            system,
            interactions,
            thermostat,
            solver: None,
            features: FeatureSet::current(),
            status: Status::Ready,
            events: EventBus::new(),
        }
    }

    /// Validates `config` and builds every subsystem it describes.
    pub fn from_config(config: &SimulationConfig) -> MolsnapResult<Self> {
        validate_config(config)?;
        let features = FeatureSet::current();
        let section = &config.particles;

        // Lattice sites come out neutral and of type 0; rebuild with the
        // configured types and alternating charges.
        let lattice = cubic_lattice(section.count, section.box_length)?;
        let mut system = ParticleSystem::new(lattice.box_l(), lattice.units())?;
        for (i, p) in lattice.particles().into_iter().enumerate() {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            system.add_particle(
                p.with_type(i as u32 % section.types)
                    .with_charge(sign * section.charge),
            )?;
        }

        let mut interactions = InteractionTable::new();
        interactions.make_type_exist(section.types - 1);
        if !config.pairs.is_empty() && !features.lennard_jones {
            return Err(MolsnapError::FeatureDisabled("lennard-jones".into()));
        }
        let presets = InteractionPresets::with_defaults();
        for pair in &config.pairs {
            let params = match (&pair.preset, pair.params) {
                (_, Some(params)) => params,
                (Some(name), None) => *presets.get(name).ok_or_else(|| {
                    MolsnapError::InvalidConfig(format!("unknown preset '{name}'"))
                })?,
                (None, None) => {
                    return Err(MolsnapError::InvalidConfig(
                        "pair without preset or params".into(),
                    ))
                }
            };
            let [a, b] = pair.types;
            interactions.set(ParticleType(a), ParticleType(b), params)?;
        }

        let mut thermostat = Thermostat::new(config.thermostat)?;
        if let Some(seed) = config.seed {
            thermostat = thermostat.with_seed(seed);
        }

        let mut sim = Self::new(system, interactions, thermostat);
        if let Some(params) = config.p3m_params() {
            sim.set_solver(Some(P3mSolver::new(params)?))?;
        }

        tracing::info!(
            particles = sim.system.len(),
            pairs = sim.interactions.len(),
            thermostat = %sim.thermostat.mode(),
            p3m = sim.solver.is_some(),
            "simulation initialized"
        );
        Ok(sim)
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem {
        &mut self.system
    }

    pub fn interactions(&self) -> &InteractionTable {
        &self.interactions
    }

    pub fn interactions_mut(&mut self) -> &mut InteractionTable {
        &mut self.interactions
    }

    pub fn thermostat(&self) -> &Thermostat {
        &self.thermostat
    }

    pub fn thermostat_mut(&mut self) -> &mut Thermostat {
        &mut self.thermostat
    }

    pub fn solver(&self) -> Option<&P3mSolver> {
        self.solver.as_ref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// Returns true if the named optional feature is compiled in.
    pub fn is_feature_enabled(&self, name: &str) -> bool {
        self.features.is_enabled(name)
    }

    /// Registers a telemetry sink.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.events.add_sink(sink);
    }

    /// Installs or removes the long-range solver.
    ///
    /// The solver's box has to match the particle box.
    pub fn set_solver(&mut self, solver: Option<P3mSolver>) -> MolsnapResult<()> {
        if let Some(s) = &solver {
            if !self.features.p3m {
                return Err(MolsnapError::FeatureDisabled("p3m".into()));
            }
            check_solver_box(s.params(), &self.system)?;
        }
        self.solver = solver;
        Ok(())
    }

    /// The subsystems that currently exist, in canonical order.
    pub fn subsystems(&self) -> Vec<SubsystemId> {
        let mut ids = MANDATORY.to_vec();
        if self.solver.is_some() {
            ids.push(SubsystemId::LongRangeSolver);
        }
        ids
    }

    fn state_objects(&self) -> Vec<&dyn StateObject> {
        let mut objects: Vec<&dyn StateObject> =
            vec![&self.system, &self.interactions, &self.thermostat];
        if let Some(solver) = &self.solver {
            objects.push(solver);
        }
        objects
    }

    fn ensure_safe(&self) -> MolsnapResult<()> {
        match self.status {
            Status::Ready => Ok(()),
            Status::Unsafe { failed } => Err(MolsnapError::Unsafe(failed)),
        }
    }

    fn emit(&self, kind: EventKind) {
        self.events
            .emit(CheckpointEvent::new(self.system.step_count(), kind));
    }

    // ─── Stepping ────────────────────────────────────────────

    /// Advances the simulation by `steps` integrator steps.
    pub fn step(&mut self, integrator: &mut dyn Integrator, steps: u64) -> MolsnapResult<()> {
        self.ensure_safe()?;
        for _ in 0..steps {
            integrator.step(&mut self.system, &mut self.thermostat)?;
        }
        tracing::debug!(
            integrator = integrator.name(),
            steps,
            sim_time = self.system.sim_time(),
            "stepped"
        );
        self.emit(EventKind::Stepped {
            steps,
            sim_time: self.system.sim_time(),
        });
        self.events.flush();
        Ok(())
    }

    // ─── Checkpoint / Restore ────────────────────────────────

    /// Checkpoints every subsystem into `dir` with the default layout.
    pub fn checkpoint(&mut self, dir: &Path) -> MolsnapResult<Snapshot> {
        self.checkpoint_with(dir, Layout::default())
    }

    /// Checkpoints every subsystem into `dir` with `layout`.
    pub fn checkpoint_with(&mut self, dir: &Path, layout: Layout) -> MolsnapResult<Snapshot> {
        self.ensure_safe()?;
        self.emit(EventKind::CheckpointBegin {
            target: dir.display().to_string(),
            layout: layout.name().to_string(),
        });

        let mut writer = CheckpointWriter::new();
        let result = writer.write(&self.state_objects(), dir, layout);
        match &result {
            Ok(snapshot) => {
                for payload in snapshot.iter() {
                    self.emit(EventKind::RecordExported {
                        subsystem: payload.subsystem,
                        bytes: payload.len() as u64,
                    });
                }
                self.emit(EventKind::CheckpointWritten {
                    records: snapshot.len() as u32,
                    bytes: snapshot.total_bytes(),
                });
            }
            Err(e) => self.emit(EventKind::CheckpointFailed {
                subsystem: e.subsystem(),
                reason: e.to_string(),
            }),
        }
        self.events.flush();
        result
    }

    /// Restores every subsystem from the checkpoint in `dir`.
    ///
    /// The layout is detected from the directory contents.
    pub fn restore(&mut self, dir: &Path) -> MolsnapResult<()> {
        self.emit(EventKind::RestoreBegin {
            target: dir.display().to_string(),
        });
        let result = self.restore_inner(dir);
        if let Err(e) = &result {
            self.emit(EventKind::RestoreFailed {
                subsystem: e.subsystem(),
                partial: matches!(self.status, Status::Unsafe { .. }),
                reason: e.to_string(),
            });
        }
        self.events.flush();
        result
    }

    fn restore_inner(&mut self, dir: &Path) -> MolsnapResult<()> {
        let mut reader = CheckpointReader::new();
        let snapshot = reader.read(dir, Layout::detect(dir))?;
        self.preflight(&snapshot, dir)?;

        // Mandatory records first, then the optional solver.
        let solver_record = snapshot.get(SubsystemId::LongRangeSolver).cloned();
        let core = Snapshot::from_payloads(
            snapshot
                .iter()
                .filter(|p| p.subsystem != SubsystemId::LongRangeSolver)
                .cloned()
                .collect(),
        )?;

        let mut objects: [&mut dyn StateObject; 3] =
            [&mut self.system, &mut self.interactions, &mut self.thermostat];
        if let RestoreOutcome::PartiallyRestored {
            failed, source, ..
        } = reader.restore(&core, &mut objects)
        {
            return Err(self.mark_unsafe(failed, source));
        }
        for &id in &MANDATORY {
            self.emit(EventKind::RecordImported { subsystem: id });
        }

        match solver_record {
            Some(payload) => {
                if let Err(e) = self.restore_solver(&payload) {
                    return Err(self.mark_unsafe(SubsystemId::LongRangeSolver, e));
                }
                self.emit(EventKind::RecordImported {
                    subsystem: SubsystemId::LongRangeSolver,
                });
            }
            None => self.solver = None,
        }

        self.status = Status::Ready;
        self.emit(EventKind::Restored {
            records: snapshot.len() as u32,
        });
        tracing::info!(
            dir = %dir.display(),
            records = snapshot.len(),
            step = self.system.step_count(),
            "simulation restored"
        );
        Ok(())
    }

    /// Checks that can be made before any live subsystem is touched.
    fn preflight(&self, snapshot: &Snapshot, dir: &Path) -> MolsnapResult<()> {
        if let Some(missing) = MANDATORY.iter().find(|id| !snapshot.contains(**id)) {
            return Err(MolsnapError::Parse {
                path: dir.display().to_string(),
                reason: format!("missing mandatory record '{missing}'"),
            });
        }
        if let Some(payload) = snapshot.get(SubsystemId::Thermostat) {
            let mode = Thermostat::recorded_mode(payload)?;
            if !mode.is_compiled() {
                return Err(MolsnapError::FeatureDisabled(
                    mode.required_feature().unwrap_or(mode.name()).to_string(),
                ));
            }
        }
        if snapshot.contains(SubsystemId::LongRangeSolver) && !self.features.p3m {
            return Err(MolsnapError::FeatureDisabled("p3m".into()));
        }
        if !self.features.lennard_jones {
            if let Some(payload) = snapshot.get(SubsystemId::InteractionTable) {
                let mut scratch = InteractionTable::new();
                scratch.import(payload)?;
                if !scratch.is_empty() {
                    return Err(MolsnapError::FeatureDisabled("lennard-jones".into()));
                }
            }
        }
        Ok(())
    }

    fn restore_solver(&mut self, payload: &Payload) -> MolsnapResult<()> {
        let params: P3mParams = payload.decode(SubsystemId::LongRangeSolver, solver::SCHEMA_VERSION)?;
        check_solver_box(&params, &self.system)?;
        match &mut self.solver {
            Some(live) => live.import(payload),
            None => {
                self.solver = Some(P3mSolver::from_payload(payload)?);
                Ok(())
            }
        }
    }

    fn mark_unsafe(&mut self, failed: SubsystemId, source: MolsnapError) -> MolsnapError {
        self.status = Status::Unsafe { failed };
        tracing::error!(
            subsystem = %failed,
            error = %source,
            "restore failed part-way; simulation marked unsafe"
        );
        MolsnapError::Restore {
            subsystem: failed,
            source: Box::new(source),
        }
    }

    /// Replaces every subsystem with an empty default and clears the
    /// unsafe flag. Registered sinks are kept.
    pub fn reset(&mut self) -> MolsnapResult<()> {
        let system = ParticleSystem::new(self.system.box_l(), self.system.units())?;
        self.system = system;
        self.interactions = InteractionTable::new();
        self.thermostat = Thermostat::off();
        self.solver = None;
        self.status = Status::Ready;
        tracing::info!("simulation reset");
        Ok(())
    }
}

fn check_solver_box(params: &P3mParams, system: &ParticleSystem) -> MolsnapResult<()> {
    if params.box_l != system.box_l() {
        return Err(MolsnapError::validation(
            SubsystemId::LongRangeSolver,
            "box_l",
            format!(
                "solver box {:?} does not match particle box {:?}",
                params.box_l,
                system.box_l()
            ),
        ));
    }
    Ok(())
}
