//! File layouts of a checkpoint directory.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use molsnap_types::{MolsnapError, SubsystemId};

/// Extension of every checkpoint file.
pub const EXTENSION: &str = "ckpt";

/// File name used by [`Layout::SingleFile`].
pub const SINGLE_FILE_NAME: &str = "snapshot.ckpt";

/// How records are spread over files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// One file per subsystem, `<file_stem>.ckpt`.
    #[default]
    PerSubsystem,
    /// All records in `snapshot.ckpt`.
    SingleFile,
}

impl Layout {
    /// Picks [`Layout::SingleFile`] if `snapshot.ckpt` exists in `dir`.
    pub fn detect(dir: &Path) -> Self {
        if dir.join(SINGLE_FILE_NAME).is_file() {
            Layout::SingleFile
        } else {
            Layout::PerSubsystem
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layout::PerSubsystem => "per-subsystem",
            Layout::SingleFile => "single-file",
        }
    }

    /// Path of the per-subsystem file for `id`.
    pub fn record_path(dir: &Path, id: SubsystemId) -> PathBuf {
        dir.join(format!("{}.{EXTENSION}", id.file_stem()))
    }

    pub fn single_file_path(dir: &Path) -> PathBuf {
        dir.join(SINGLE_FILE_NAME)
    }

    /// Every file this layout can produce in `dir`.
    pub fn all_paths(&self, dir: &Path) -> Vec<PathBuf> {
        match self {
            Layout::PerSubsystem => SubsystemId::all()
                .iter()
                .map(|&id| Self::record_path(dir, id))
                .collect(),
            Layout::SingleFile => vec![Self::single_file_path(dir)],
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = MolsnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-subsystem" => Ok(Layout::PerSubsystem),
            "single-file" => Ok(Layout::SingleFile),
            other => Err(MolsnapError::InvalidConfig(format!(
                "unknown layout '{other}' (expected per-subsystem or single-file)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_paths_use_file_stems() {
        let p = Layout::record_path(Path::new("/out"), SubsystemId::LongRangeSolver);
        assert_eq!(p, Path::new("/out/p3m_save.ckpt"));
    }

    #[test]
    fn parse_names() {
        for layout in [Layout::PerSubsystem, Layout::SingleFile] {
            assert_eq!(layout.name().parse::<Layout>().unwrap(), layout);
        }
        assert!("zip".parse::<Layout>().is_err());
    }
}
