//! # molsnap-checkpoint
//!
//! Persists and restores [`Snapshot`]s of live [`StateObject`]s.
//!
//! ## Guarantees
//!
//! - Nothing is written unless every subsystem exported successfully.
//! - Files appear all at once: temporaries are renamed only after
//!   every file is fsynced; a failed rename removes what this call
//!   already renamed.
//! - Every record is framed with magic, format version, length and a
//!   SHA-256 digest; corrupt files are rejected before any import.
//! - One writer or many readers per directory (`fs2` advisory locks).
//!
//! [`StateObject`]: molsnap_types::StateObject

pub mod layout;
pub mod lock;
pub mod reader;
pub mod record;
pub mod snapshot;
pub mod writer;

pub use layout::Layout;
pub use reader::{CheckpointReader, RestoreOutcome, RestorePhase};
pub use record::{inspect, RecordInfo};
pub use snapshot::Snapshot;
pub use writer::{CheckpointPhase, CheckpointWriter};
