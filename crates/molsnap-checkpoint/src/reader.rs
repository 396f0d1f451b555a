//! Checkpoint reader.
//!
//! Reading and restoring are separate calls. [`CheckpointReader::read`]
//! parses and verifies every file without touching any live object;
//! [`CheckpointReader::restore`] then dispatches records to their
//! subsystems in canonical order and stops at the first rejection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use molsnap_types::{MolsnapError, MolsnapResult, StateObject, SubsystemId};

use crate::layout::Layout;
use crate::lock::DirLock;
use crate::record::{self, Generation};
use crate::snapshot::Snapshot;

/// Where a reader call ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestorePhase {
    #[default]
    Idle,
    Reading,
    Importing,
    Restored,
    /// Files could not be parsed; no live object was touched.
    ParseFailed,
    /// Some subsystems were replaced before one rejected its record.
    PartiallyRestored,
}

impl RestorePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Restored | Self::ParseFailed | Self::PartiallyRestored)
    }
}

/// Result of dispatching a snapshot to live objects.
#[derive(Debug)]
pub enum RestoreOutcome {
    /// Every record was imported, in this order.
    Restored(Vec<SubsystemId>),
    /// `restored` were replaced, then `failed` rejected its record.
    PartiallyRestored {
        restored: Vec<SubsystemId>,
        failed: SubsystemId,
        source: MolsnapError,
    },
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, Self::Restored(_))
    }

    /// Converts a partial restore into [`MolsnapError::Restore`].
    pub fn into_result(self) -> MolsnapResult<Vec<SubsystemId>> {
        match self {
            Self::Restored(ids) => Ok(ids),
            Self::PartiallyRestored { failed, source, .. } => Err(MolsnapError::Restore {
                subsystem: failed,
                source: Box::new(source),
            }),
        }
    }
}

/// Reads snapshots and restores them. Keeps only the phase of its last call.
#[derive(Debug, Default)]
pub struct CheckpointReader {
    phase: RestorePhase,
}

impl CheckpointReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RestorePhase {
        self.phase
    }

    /// Reads and verifies the snapshot stored in `dir`.
    pub fn read(&mut self, dir: &Path, layout: Layout) -> MolsnapResult<Snapshot> {
        self.phase = RestorePhase::Reading;
        match read_snapshot(dir, layout) {
            Ok(snapshot) => {
                tracing::debug!(
                    dir = %dir.display(),
                    records = snapshot.len(),
                    "checkpoint read"
                );
                Ok(snapshot)
            }
            Err(e) => {
                self.phase = RestorePhase::ParseFailed;
                tracing::error!(dir = %dir.display(), error = %e, "checkpoint unreadable");
                Err(e)
            }
        }
    }

    /// Imports each record into the object with the same subsystem id.
    ///
    /// Objects without a record are left alone. A record without a
    /// matching object counts as a failed import.
    pub fn restore(
        &mut self,
        snapshot: &Snapshot,
        objects: &mut [&mut dyn StateObject],
    ) -> RestoreOutcome {
        self.phase = RestorePhase::Importing;
        let mut restored = Vec::with_capacity(snapshot.len());

        for payload in snapshot.iter() {
            let id = payload.subsystem;
            let result = match objects.iter_mut().find(|o| o.subsystem() == id) {
                Some(object) => object.import(payload),
                None => Err(MolsnapError::invalid_state(
                    id,
                    "snapshot has a record but no live subsystem accepts it",
                )),
            };
            match result {
                Ok(()) => {
                    tracing::debug!(subsystem = %id, "record imported");
                    restored.push(id);
                }
                Err(source) => {
                    self.phase = RestorePhase::PartiallyRestored;
                    tracing::error!(
                        subsystem = %id,
                        restored = ?restored,
                        error = %source,
                        "restore stopped; simulation state is inconsistent"
                    );
                    return RestoreOutcome::PartiallyRestored {
                        restored,
                        failed: id,
                        source,
                    };
                }
            }
        }

        self.phase = RestorePhase::Restored;
        tracing::info!(records = restored.len(), "checkpoint restored");
        RestoreOutcome::Restored(restored)
    }
}

fn parse_error(path: &Path, reason: impl Into<String>) -> MolsnapError {
    MolsnapError::Parse {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn read_file(path: &Path) -> MolsnapResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(parse_error(path, e.to_string())),
    }
}

fn read_snapshot(dir: &Path, layout: Layout) -> MolsnapResult<Snapshot> {
    if !dir.is_dir() {
        return Err(parse_error(dir, "not a directory"));
    }
    let _lock = DirLock::shared(dir)?;

    let mut payloads = Vec::new();
    match layout {
        Layout::PerSubsystem => {
            let mut first: Option<(Generation, PathBuf)> = None;
            for &id in SubsystemId::all() {
                let path = Layout::record_path(dir, id);
                let Some(bytes) = read_file(&path)? else {
                    continue;
                };
                let (generation, mut records) = record::decode_file(&bytes, &path)?;
                if records.len() != 1 || records[0].subsystem != id {
                    let found: Vec<SubsystemId> = records.iter().map(|p| p.subsystem).collect();
                    return Err(parse_error(
                        &path,
                        format!("expected a single {id} record, found {found:?}"),
                    ));
                }
                match &first {
                    Some((expected, origin)) if *expected != generation => {
                        return Err(parse_error(
                            &path,
                            format!(
                                "written by a different checkpoint than {}",
                                origin.display()
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => first = Some((generation, path.clone())),
                }
                payloads.append(&mut records);
            }
        }
        Layout::SingleFile => {
            let path = Layout::single_file_path(dir);
            let bytes = read_file(&path)?.ok_or_else(|| parse_error(&path, "file not found"))?;
            payloads = record::decode_file(&bytes, &path)?.1;
        }
    }

    if payloads.is_empty() {
        return Err(parse_error(dir, "no checkpoint records"));
    }
    Snapshot::from_payloads(payloads).map_err(|e| parse_error(dir, e.to_string()))
}
