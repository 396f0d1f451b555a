//! Event bus: channel-backed dispatch to pluggable sinks.
//!
//! Events are queued on an `mpsc` channel by `emit` and handed to every
//! registered sink on `flush`.

use std::sync::mpsc;

use crate::events::CheckpointEvent;
use crate::sinks::EventSink;

/// Broadcast event bus for checkpoint telemetry.
pub struct EventBus {
    sender: mpsc::Sender<CheckpointEvent>,
    receiver: mpsc::Receiver<CheckpointEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// Disabled bus drops events.
    enabled: bool,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues an event. No-op while disabled.
    pub fn emit(&self, event: CheckpointEvent) {
        if !self.enabled {
            return;
        }
        // The receiver lives in `self`, so send cannot fail.
        let _ = self.sender.send(event);
    }

    /// Dispatches all queued events to the registered sinks.
    ///
    /// The driver flushes at the end of every checkpoint, restore and
    /// step call.
    pub fn flush(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
        }
    }

    /// Flushes and lets every sink finish.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("EventBus")
            .field("sinks", &names)
            .field("enabled", &self.enabled)
            .finish()
    }
}
