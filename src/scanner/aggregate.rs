use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::risk::{RiskPolicy, RiskTier};
use super::walker::{bytes_to_mb, FileEntry};

/// All discovered files sharing one immediate parent directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderGroup {
    /// Parent directory, exactly as discovered
    pub path: PathBuf,

    /// Files in discovery order
    pub files: Vec<FileEntry>,

    /// Exact sum of the files' sizes
    pub total_bytes: u64,

    /// `total_bytes` in binary megabytes, two decimals
    pub total_size_mb: f64,

    pub file_count: usize,

    pub risk: RiskTier,
}

impl FolderGroup {
    fn assemble(path: PathBuf, files: Vec<FileEntry>, policy: &RiskPolicy) -> Self {
        let total_bytes = files.iter().map(|f| f.size_bytes).sum();
        let total_size_mb = bytes_to_mb(total_bytes);
        Self {
            path,
            file_count: files.len(),
            files,
            total_bytes,
            total_size_mb,
            risk: policy.classify(total_size_mb),
        }
    }

    pub fn allows_whole_folder_removal(&self) -> bool {
        self.risk.allows_whole_folder_removal()
    }

    pub fn file(&self, path: &Path) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Display name: the folder's last component, or the full path for roots
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Groups file entries by parent directory, preserving insertion order.
///
/// Parent paths are compared as-is. A file path seen twice (overlapping
/// roots) is only counted once.
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: IndexMap<PathBuf, Vec<FileEntry>>,
    seen: HashSet<PathBuf>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FileEntry) {
        if !self.seen.insert(entry.path.clone()) {
            return;
        }
        let parent = entry.parent().to_path_buf();
        self.groups.entry(parent).or_default().push(entry);
    }

    /// Number of folders collected so far
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total and risk-classify every group
    pub fn finish(self, policy: &RiskPolicy) -> IndexMap<PathBuf, FolderGroup> {
        self.groups
            .into_iter()
            .map(|(path, files)| {
                let group = FolderGroup::assemble(path.clone(), files, policy);
                (path, group)
            })
            .collect()
    }
}

impl Extend<FileEntry> for Aggregator {
    fn extend<I: IntoIterator<Item = FileEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.push(entry);
        }
    }
}

/// Group entries by parent directory and classify each group
pub fn group<I>(entries: I, policy: &RiskPolicy) -> IndexMap<PathBuf, FolderGroup>
where
    I: IntoIterator<Item = FileEntry>,
{
    let mut aggregator = Aggregator::new();
    aggregator.extend(entries);
    aggregator.finish(policy)
}
