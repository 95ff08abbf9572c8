use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::common::errors::SweepError;
use crate::scanner::aggregate::FolderGroup;

/// How a selected path entered the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// The whole folder of a Low or Review group
    WholeFolder,
    /// One file picked out of a High group
    FileInHighFolder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalTarget {
    pub path: PathBuf,
    pub kind: TargetKind,
    /// Size known from the scan, counted as freed on success
    pub size_bytes: u64,
}

/// Paths chosen for a removal pass, validated against their folder groups
#[derive(Debug, Clone, Default)]
pub struct Selection {
    targets: Vec<RemovalTarget>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a whole folder. Refused for High-tier groups.
    pub fn add_folder(&mut self, group: &FolderGroup) -> Result<(), SweepError> {
        if !group.allows_whole_folder_removal() {
            return Err(SweepError::WholeFolderNotAllowed {
                path: group.path.clone(),
                tier: group.risk,
            });
        }
        self.push(RemovalTarget {
            path: group.path.clone(),
            kind: TargetKind::WholeFolder,
            size_bytes: group.total_bytes,
        });
        Ok(())
    }

    /// Select one file of a High-tier group
    pub fn add_file(&mut self, group: &FolderGroup, file: &Path) -> Result<(), SweepError> {
        if group.allows_whole_folder_removal() {
            return Err(SweepError::FileSelectionNotAllowed {
                path: group.path.clone(),
                tier: group.risk,
            });
        }
        let entry = group.file(file).ok_or_else(|| SweepError::NotInGroup {
            file: file.to_path_buf(),
            folder: group.path.clone(),
        })?;
        self.push(RemovalTarget {
            path: entry.path.clone(),
            kind: TargetKind::FileInHighFolder,
            size_bytes: entry.size_bytes,
        });
        Ok(())
    }

    fn push(&mut self, target: RemovalTarget) {
        if !self.targets.iter().any(|t| t.path == target.path) {
            self.targets.push(target);
        }
    }

    pub fn targets(&self) -> &[RemovalTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.targets.iter().map(|t| t.size_bytes).sum()
    }
}
