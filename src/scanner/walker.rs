use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert bytes to binary megabytes rounded to two decimals.
///
/// Every megabyte figure in the crate goes through here, per file and per
/// folder group alike.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}

/// A non-empty regular file discovered by a walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl FileEntry {
    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }

    /// Immediate containing directory
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

type DirFilter = fn(&Path) -> bool;

/// Lazy walk over every file under a root.
///
/// Every directory is descended into. The optional filter is consulted with
/// a file's parent directory and only decides whether that file is
/// reported. Unreadable entries, zero-byte files and anything that is not a
/// regular file are skipped silently.
pub struct FileWalk<F = DirFilter> {
    inner: walkdir::IntoIter,
    filter: Option<F>,
    last_dir: Option<(PathBuf, bool)>,
}

/// Walk `root` and report every non-empty file
pub fn scan(root: &Path) -> FileWalk {
    FileWalk {
        inner: walker(root),
        filter: None,
        last_dir: None,
    }
}

/// Walk `root`, reporting only files whose parent directory passes `filter`
pub fn scan_filtered<F>(root: &Path, filter: F) -> FileWalk<F>
where
    F: FnMut(&Path) -> bool,
{
    FileWalk {
        inner: walker(root),
        filter: Some(filter),
        last_dir: None,
    }
}

fn walker(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root).follow_links(false).into_iter()
}

impl<F: FnMut(&Path) -> bool> FileWalk<F> {
    fn reports_dir(&mut self, dir: &Path) -> bool {
        let Some(filter) = self.filter.as_mut() else {
            return true;
        };

        // Sibling files arrive together, so one remembered verdict covers most lookups
        if let Some((last, verdict)) = &self.last_dir {
            if last == dir {
                return *verdict;
            }
        }

        let verdict = filter(dir);
        self.last_dir = Some((dir.to_path_buf(), verdict));
        verdict
    }
}

impl<F: FnMut(&Path) -> bool> Iterator for FileWalk<F> {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let parent = entry.path().parent().unwrap_or_else(|| Path::new(""));
            if !self.reports_dir(parent) {
                continue;
            }

            // Size through the followed metadata; dangling links and cycles fail here
            let metadata = match std::fs::metadata(entry.path()) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), error = %e, "skipping file without metadata");
                    continue;
                }
            };

            if !metadata.is_file() || metadata.len() == 0 {
                continue;
            }

            return Some(FileEntry {
                path: entry.into_path(),
                size_bytes: metadata.len(),
            });
        }
    }
}
