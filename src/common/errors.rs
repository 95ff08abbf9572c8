use std::path::PathBuf;
use thiserror::Error;

use crate::scanner::risk::RiskTier;

/// Refusals surfaced by the core.
///
/// Per-item scan and removal failures never show up here; those are
/// absorbed by the walker or reported as a `RemovalOutcome`.
#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    /// A scan is running, or its results have not been through a removal pass
    #[error("A scan is already in progress or its results are awaiting review. Clean results before running another scan.")]
    ScanInProgress,

    /// Removal was requested without a completed, unreviewed scan
    #[error("No scan results are pending review")]
    NoPendingResults,

    /// High-tier folders may only be cleaned file by file
    #[error("'{}' is {tier} risk and cannot be removed as a whole folder", .path.display())]
    WholeFolderNotAllowed { path: PathBuf, tier: RiskTier },

    /// Individual file selection is reserved for High-tier folders
    #[error("Files in '{}' ({tier} risk) can only be removed with their folder", .path.display())]
    FileSelectionNotAllowed { path: PathBuf, tier: RiskTier },

    /// The file does not belong to the folder group it was selected from
    #[error("'{}' is not part of folder group '{}'", .file.display(), .folder.display())]
    NotInGroup { file: PathBuf, folder: PathBuf },
}
