use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use super::remover::{remove_path, RemovalOutcome};
use super::selection::Selection;
use crate::common::activity::ActivityLog;
use crate::common::errors::SweepError;
use crate::common::format;
use crate::scanner::session::ScanSession;

/// Report from a removal pass
#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
    /// One outcome per selected path, in selection order
    pub outcomes: Vec<RemovalOutcome>,
    pub removed: usize,
    pub skipped: usize,
    pub bytes_freed: u64,
}

impl CleanReport {
    /// Outcomes that did not remove anything
    pub fn skipped_outcomes(&self) -> impl Iterator<Item = &RemovalOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }
}

/// Remove every selected path in order.
///
/// Failures never stop the batch; each lands in the report as a skipped
/// outcome.
pub fn remove_all(selection: &Selection, show_progress: bool) -> CleanReport {
    let pb = if show_progress {
        let pb = ProgressBar::new(selection.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.red} [{bar:40.red/blue}] {pos}/{len} Removing... {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    let mut report = CleanReport::default();

    for target in selection.targets() {
        if let Some(ref pb) = pb {
            pb.set_message(format::truncate(&format::format_path(&target.path), 40));
        }

        let outcome = remove_path(&target.path);
        if outcome.succeeded {
            report.removed += 1;
            report.bytes_freed += target.size_bytes;
        } else {
            report.skipped += 1;
        }
        report.outcomes.push(outcome);

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    report
}

/// Removal pass over a session's pending results.
///
/// Requires a completed, unreviewed scan. The session is cleared afterwards
/// whatever the outcomes, so the next scan may start.
pub fn clean(
    selection: &Selection,
    session: &ScanSession,
    log: &dyn ActivityLog,
    show_progress: bool,
) -> Result<CleanReport, SweepError> {
    session.ensure_pending()?;

    log.record(&format!("Cleanup started: {}", format::format_items(selection.len())));
    let report = remove_all(selection, show_progress);
    session.finish_review();

    let summary = format!(
        "Cleanup finished: removed {}, skipped {}, freed {}",
        report.removed,
        report.skipped,
        format::format_size(report.bytes_freed)
    );
    tracing::info!("{}", summary);
    log.record(&summary);

    Ok(report)
}
