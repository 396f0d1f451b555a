//! Error types for the molsnap core.
//!
//! All crates return `MolsnapResult<T>` from fallible operations.
//! Every variant carries enough context (subsystem, field) for the
//! caller to diagnose a failure without re-reading the snapshot.

use thiserror::Error;

use crate::state::SubsystemId;

/// Unified error type for the molsnap core.
#[derive(Debug, Error)]
pub enum MolsnapError {
    /// A subsystem cannot export because its own invariants are broken.
    #[error("Invalid state in {subsystem}: {reason}")]
    InvalidState {
        subsystem: SubsystemId,
        reason: String,
    },

    /// A field is out of its allowed range or references something missing.
    #[error("Validation failed for {subsystem}.{field}: {reason}")]
    Validation {
        subsystem: SubsystemId,
        field: &'static str,
        reason: String,
    },

    /// Payload id or schema version does not match what the importer expects.
    #[error("Schema mismatch for {subsystem}: expected {expected}, found {found}")]
    SchemaMismatch {
        subsystem: SubsystemId,
        expected: String,
        found: String,
    },

    /// Checkpoint aborted because one subsystem failed to export.
    #[error("Export of {subsystem} failed: {source}")]
    Export {
        subsystem: SubsystemId,
        #[source]
        source: Box<MolsnapError>,
    },

    /// Restore failed while importing one subsystem.
    #[error("Restore of {subsystem} failed: {source}")]
    Restore {
        subsystem: SubsystemId,
        #[source]
        source: Box<MolsnapError>,
    },

    /// A checkpoint file is unreadable or corrupt.
    #[error("Cannot parse checkpoint {path}: {reason}")]
    Parse { path: String, reason: String },

    /// I/O operation failed. Never retried.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested subsystem or mode is not compiled into this build.
    #[error("Feature not enabled in this build: {0}")]
    FeatureDisabled(String),

    /// The driver was left partially restored and must be set up again.
    #[error("Simulation is in an unsafe, partially restored state (failed at {0})")]
    Unsafe(SubsystemId),
}

impl MolsnapError {
    /// Shorthand for a [`MolsnapError::Validation`].
    pub fn validation(subsystem: SubsystemId, field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            subsystem,
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`MolsnapError::InvalidState`].
    pub fn invalid_state(subsystem: SubsystemId, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            subsystem,
            reason: reason.into(),
        }
    }

    /// Returns the offending field name for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            Self::Export { source, .. } | Self::Restore { source, .. } => source.field(),
            _ => None,
        }
    }

    /// Returns the subsystem this error is attributed to, if any.
    pub fn subsystem(&self) -> Option<SubsystemId> {
        match self {
            Self::InvalidState { subsystem, .. }
            | Self::Validation { subsystem, .. }
            | Self::SchemaMismatch { subsystem, .. }
            | Self::Export { subsystem, .. }
            | Self::Restore { subsystem, .. } => Some(*subsystem),
            Self::Unsafe(subsystem) => Some(*subsystem),
            _ => None,
        }
    }
}

impl From<bincode::Error> for MolsnapError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience alias for `Result<T, MolsnapError>`.
pub type MolsnapResult<T> = Result<T, MolsnapError>;
