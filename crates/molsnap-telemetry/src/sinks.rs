//! Pluggable event sinks.

use std::sync::{Arc, Mutex};

use crate::events::{CheckpointEvent, EventKind};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &CheckpointEvent);

    /// Called when the driver shuts down.
    fn finalize(&mut self) {}

    fn name(&self) -> &str;
}

/// Collects events in memory.
///
/// The buffer is shared, so a clone kept outside the bus can inspect
/// what was delivered after the sink itself has been boxed.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<CheckpointEvent>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far.
    pub fn events(&self) -> Vec<CheckpointEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &CheckpointEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing`. Failures are logged at error level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &CheckpointEvent) {
        match &event.kind {
            EventKind::CheckpointFailed { subsystem, reason } => {
                tracing::error!(step = event.step, ?subsystem, %reason, "checkpoint failed");
            }
            EventKind::RestoreFailed {
                subsystem,
                partial,
                reason,
            } => {
                tracing::error!(step = event.step, ?subsystem, partial, %reason, "restore failed");
            }
            kind => {
                tracing::debug!(step = event.step, event = ?kind, "checkpoint_event");
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
