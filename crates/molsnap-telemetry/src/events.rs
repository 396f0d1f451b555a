//! Checkpoint lifecycle events.
//!
//! Events are small value types tagged with the simulation step at
//! which they happened. They carry enough to reconstruct what a
//! checkpoint or restore call did without reading the files.

use serde::{Deserialize, Serialize};
use molsnap_types::SubsystemId;

/// An event emitted by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointEvent {
    /// Simulation step counter when the event was emitted.
    pub step: u64,
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A checkpoint call started.
    CheckpointBegin {
        target: String,
        layout: String,
    },

    /// One subsystem exported its payload.
    RecordExported {
        subsystem: SubsystemId,
        /// Encoded body size.
        bytes: u64,
    },

    /// All records are durable on disk.
    CheckpointWritten {
        records: u32,
        bytes: u64,
    },

    /// A checkpoint call failed; nothing new remains on disk.
    CheckpointFailed {
        subsystem: Option<SubsystemId>,
        reason: String,
    },

    /// A restore call started.
    RestoreBegin {
        target: String,
    },

    /// One subsystem accepted its payload.
    RecordImported {
        subsystem: SubsystemId,
    },

    /// Every record was imported.
    Restored {
        records: u32,
    },

    /// A restore call failed. `partial` is true if some subsystems were
    /// already replaced.
    RestoreFailed {
        subsystem: Option<SubsystemId>,
        partial: bool,
        reason: String,
    },

    /// Simulation advanced.
    Stepped {
        steps: u64,
        sim_time: f64,
    },

    /// Custom event for extensibility.
    Custom {
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl CheckpointEvent {
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }

    /// Returns true for the failure variants.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::CheckpointFailed { .. } | EventKind::RestoreFailed { .. }
        )
    }
}
