//! Checkpoint writer.
//!
//! ```text
//! Idle → Exporting → Serializing → Written
//!            ↓            ↓     ↘
//!          Failed       Failed   WriteFailed
//! ```
//!
//! All payloads are exported and encoded in memory before the first
//! byte hits the disk. Files go to temporary siblings in the target
//! directory, are fsynced, and are renamed into place only once every
//! file is complete.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use molsnap_types::{MolsnapError, MolsnapResult, Payload, StateObject};

use crate::layout::Layout;
use crate::lock::DirLock;
use crate::record;
use crate::snapshot::Snapshot;

/// Where a writer call ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckpointPhase {
    #[default]
    Idle,
    Exporting,
    Serializing,
    /// Every file is durable.
    Written,
    /// A subsystem could not export or encode; nothing was written.
    Failed,
    /// I/O failed; files produced by this call were removed.
    WriteFailed,
}

impl CheckpointPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Written | Self::Failed | Self::WriteFailed)
    }
}

/// Writes snapshots. Keeps only the phase of its last call.
#[derive(Debug, Default)]
pub struct CheckpointWriter {
    phase: CheckpointPhase,
}

impl CheckpointWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CheckpointPhase {
        self.phase
    }

    /// Exports `objects` and persists them to `dir` with `layout`.
    pub fn write(
        &mut self,
        objects: &[&dyn StateObject],
        dir: &Path,
        layout: Layout,
    ) -> MolsnapResult<Snapshot> {
        self.phase = CheckpointPhase::Exporting;
        let snapshot = match export_all(objects) {
            Ok(s) => s,
            Err(e) => {
                self.phase = CheckpointPhase::Failed;
                return Err(e);
            }
        };

        self.phase = CheckpointPhase::Serializing;
        let files = match encode(&snapshot, dir, layout) {
            Ok(f) => f,
            Err(e) => {
                self.phase = CheckpointPhase::Failed;
                return Err(e);
            }
        };

        if let Err(e) = persist(&files, dir, layout) {
            self.phase = CheckpointPhase::WriteFailed;
            tracing::error!(dir = %dir.display(), error = %e, "checkpoint write failed");
            return Err(e);
        }

        self.phase = CheckpointPhase::Written;
        tracing::info!(
            dir = %dir.display(),
            layout = %layout,
            records = snapshot.len(),
            bytes = snapshot.total_bytes(),
            "checkpoint written"
        );
        Ok(snapshot)
    }
}

fn export_all(objects: &[&dyn StateObject]) -> MolsnapResult<Snapshot> {
    let mut payloads = Vec::with_capacity(objects.len());
    for object in objects {
        let subsystem = object.subsystem();
        let payload = object.export().map_err(|e| MolsnapError::Export {
            subsystem,
            source: Box::new(e),
        })?;
        if payload.subsystem != subsystem || payload.schema_version != object.schema_version() {
            return Err(MolsnapError::Export {
                subsystem,
                source: Box::new(MolsnapError::invalid_state(
                    subsystem,
                    format!(
                        "exported payload is tagged {} v{}",
                        payload.subsystem, payload.schema_version
                    ),
                )),
            });
        }
        tracing::debug!(%subsystem, bytes = payload.len(), "record exported");
        payloads.push(payload);
    }
    Snapshot::from_payloads(payloads)
}

fn encode(snapshot: &Snapshot, dir: &Path, layout: Layout) -> MolsnapResult<Vec<(PathBuf, Vec<u8>)>> {
    let all: Vec<&Payload> = snapshot.iter().collect();
    let generation = record::generation(&all);
    match layout {
        Layout::PerSubsystem => all
            .iter()
            .map(|p| {
                let bytes = record::encode_file(&[*p], generation)?;
                Ok((Layout::record_path(dir, p.subsystem), bytes))
            })
            .collect(),
        Layout::SingleFile => Ok(vec![(
            Layout::single_file_path(dir),
            record::encode_file(&all, generation)?,
        )]),
    }
}

fn persist(files: &[(PathBuf, Vec<u8>)], dir: &Path, layout: Layout) -> MolsnapResult<()> {
    fs::create_dir_all(dir)?;
    let _lock = DirLock::exclusive(dir)?;

    // Temporaries are deleted on drop if anything below fails.
    let mut staged = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        staged.push((tmp, path));
    }

    let mut renamed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in &renamed {
                let _ = fs::remove_file(done);
            }
            return Err(e.error.into());
        }
        renamed.push(path.as_path());
    }
    sync_dir(dir);

    remove_stale(dir, layout, &renamed);
    Ok(())
}

/// Removes files of either layout that this write did not produce, so
/// a later read never mixes records from two checkpoints.
fn remove_stale(dir: &Path, layout: Layout, written: &[&Path]) {
    let other = match layout {
        Layout::PerSubsystem => Layout::SingleFile,
        Layout::SingleFile => Layout::PerSubsystem,
    };
    let candidates = layout.all_paths(dir).into_iter().chain(other.all_paths(dir));
    for path in candidates {
        if written.contains(&path.as_path()) || !path.exists() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale record file"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove stale record file"),
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
