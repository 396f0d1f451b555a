//! # molsnap-telemetry
//!
//! Event bus for checkpoint telemetry. The driver emits structured
//! lifecycle events (export, write, read, import, failure) that are
//! consumed by pluggable sinks (tracing, in-memory capture).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{CheckpointEvent, EventKind};
pub use sinks::{EventSink, TracingSink, VecSink};
