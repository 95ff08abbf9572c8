use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::common::errors::SweepError;

/// Lifecycle of one scan's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No results held; a scan may start
    #[default]
    Idle,
    /// A scan worker is running
    Scanning,
    /// Results delivered and waiting for a removal pass
    PendingReview,
}

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    folders: Vec<PathBuf>,
}

/// Process-wide single-flight guard for scans.
///
/// Cloning shares the same state, so the scan worker and the caller see
/// one session. At most one populated, unreviewed result set exists at a
/// time: `begin` only succeeds from `Idle`, and only a removal pass
/// (`finish_review`) returns the session to `Idle`.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    inner: Arc<Mutex<Inner>>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Folder groups recorded so far, by path; the groups themselves go to the caller
    pub fn folders(&self) -> Vec<PathBuf> {
        self.lock().folders.clone()
    }

    pub(crate) fn begin(&self) -> Result<(), SweepError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Idle {
            return Err(SweepError::ScanInProgress);
        }
        inner.state = SessionState::Scanning;
        inner.folders.clear();
        Ok(())
    }

    pub(crate) fn record(&self, folder: &Path) {
        self.lock().folders.push(folder.to_path_buf());
    }

    pub(crate) fn complete(&self) {
        let mut inner = self.lock();
        if inner.state == SessionState::Scanning {
            inner.state = SessionState::PendingReview;
        }
    }

    /// Fails unless a completed scan is waiting for review
    pub(crate) fn ensure_pending(&self) -> Result<(), SweepError> {
        match self.state() {
            SessionState::PendingReview => Ok(()),
            _ => Err(SweepError::NoPendingResults),
        }
    }

    pub(crate) fn finish_review(&self) {
        let mut inner = self.lock();
        inner.state = SessionState::Idle;
        inner.folders.clear();
    }

    /// Drop a scan that died before completing; its partial results are discarded
    pub(crate) fn abandon(&self) {
        let mut inner = self.lock();
        if inner.state == SessionState::Scanning {
            inner.state = SessionState::Idle;
            inner.folders.clear();
        }
    }
}
