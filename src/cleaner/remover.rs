use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

/// Why a removal did or did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    Removed,
    NotFound,
    AccessDenied,
    InUseOrLocked,
    /// Empty directories are deliberately left in place
    EmptyFolder,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalReason::Removed => write!(f, "Removed"),
            RemovalReason::NotFound => write!(f, "Path not found"),
            RemovalReason::AccessDenied => write!(f, "Access denied"),
            RemovalReason::InUseOrLocked => write!(f, "In use or locked"),
            RemovalReason::EmptyFolder => write!(f, "Empty folder"),
        }
    }
}

/// Result of one removal request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalOutcome {
    pub path: PathBuf,
    pub succeeded: bool,
    pub reason: RemovalReason,
}

impl RemovalOutcome {
    fn removed(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            succeeded: true,
            reason: RemovalReason::Removed,
        }
    }

    fn skipped(path: &Path, reason: RemovalReason) -> Self {
        Self {
            path: path.to_path_buf(),
            succeeded: false,
            reason,
        }
    }
}

/// Delete a file, or a non-empty directory with everything in it.
///
/// Never panics and never returns an error: every failure is folded into
/// the outcome's reason. A symlink is unlinked, never followed.
pub fn remove_path(path: &Path) -> RemovalOutcome {
    if std::fs::metadata(path).is_err() {
        return RemovalOutcome::skipped(path, RemovalReason::NotFound);
    }

    let is_real_dir = match std::fs::symlink_metadata(path) {
        Ok(m) => m.is_dir(),
        Err(e) => return RemovalOutcome::skipped(path, reason_for(&e)),
    };

    let result = if is_real_dir {
        match is_empty_dir(path) {
            Ok(true) => return RemovalOutcome::skipped(path, RemovalReason::EmptyFolder),
            Ok(false) => std::fs::remove_dir_all(path),
            Err(e) => Err(e),
        }
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed");
            RemovalOutcome::removed(path)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "removal failed");
            RemovalOutcome::skipped(path, reason_for(&e))
        }
    }
}

fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

fn reason_for(e: &io::Error) -> RemovalReason {
    match e.kind() {
        io::ErrorKind::PermissionDenied => RemovalReason::AccessDenied,
        _ => RemovalReason::InUseOrLocked,
    }
}
