pub mod aggregate;
pub mod leftovers;
pub mod risk;
pub mod roots;
pub mod session;
pub mod walker;

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::cleaner::{self, CleanReport, Selection};
use crate::common::activity::ActivityLog;
use crate::common::config::Config;
use crate::common::errors::SweepError;
use crate::common::safety::CachePathClassifier;

use aggregate::{Aggregator, FolderGroup};
use risk::RiskPolicy;
use roots::ScanRoots;
use session::ScanSession;

/// Which roots are scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// System temp directory only, unfiltered
    #[default]
    Safe,
    /// Safe scan plus application-data roots, cache locations only
    Deep,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanMode::Safe => write!(f, "safe"),
            ScanMode::Deep => write!(f, "deep"),
        }
    }
}

/// Discovery events sent by the scan worker
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Phase transition, human readable
    Status(String),
    /// A fully assembled, risk-classified folder group
    Folder(FolderGroup),
    /// No more events follow
    Finished,
}

/// Receiving end of a running scan
pub struct ScanHandle {
    events: Receiver<ScanEvent>,
    worker: Option<JoinHandle<()>>,
}

impl ScanHandle {
    /// Drain all events and return the folder groups in emission order
    pub fn wait(mut self) -> Vec<FolderGroup> {
        let mut groups = Vec::new();
        for event in self.by_ref() {
            if let ScanEvent::Folder(group) = event {
                groups.push(group);
            }
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("scan worker panicked");
            }
        }
        groups
    }
}

impl Iterator for ScanHandle {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        self.events.recv().ok()
    }
}

/// Composes walking, aggregation and risk tiering across the configured
/// roots, and owns the session that gates new scans behind removal passes.
pub struct ScanOrchestrator {
    roots: ScanRoots,
    classifier: Arc<CachePathClassifier>,
    policy: RiskPolicy,
    log: Arc<dyn ActivityLog>,
    session: ScanSession,
}

impl ScanOrchestrator {
    pub fn new(
        roots: ScanRoots,
        classifier: CachePathClassifier,
        policy: RiskPolicy,
        log: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            roots,
            classifier: Arc::new(classifier),
            policy,
            log,
            session: ScanSession::new(),
        }
    }

    /// Orchestrator over the detected platform roots
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ScanRoots::detect(),
            config.classifier(),
            config.risk_policy(),
            Arc::new(config.activity_log()),
        )
    }

    pub fn roots(&self) -> &ScanRoots {
        &self.roots
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Start a scan on a background worker.
    ///
    /// Refused with [`SweepError::ScanInProgress`] while another scan runs or
    /// while the previous results have not been through [`Self::remove`].
    pub fn run(&self, mode: ScanMode) -> Result<ScanHandle, SweepError> {
        self.session.begin()?;

        let (tx, rx) = mpsc::channel();
        let job = ScanJob {
            mode,
            roots: self.roots.clone(),
            classifier: Arc::clone(&self.classifier),
            policy: self.policy,
            log: Arc::clone(&self.log),
            session: self.session.clone(),
            tx,
        };
        let worker = std::thread::spawn(move || {
            let _guard = AbandonOnPanic(job.session.clone());
            job.run()
        });

        Ok(ScanHandle {
            events: rx,
            worker: Some(worker),
        })
    }

    /// Run a scan and wait for all of its groups
    pub fn scan_blocking(&self, mode: ScanMode) -> Result<Vec<FolderGroup>, SweepError> {
        Ok(self.run(mode)?.wait())
    }

    /// Removal pass over the pending results; clears the session afterwards
    pub fn remove(&self, selection: &Selection, show_progress: bool) -> Result<CleanReport, SweepError> {
        cleaner::clean(selection, &self.session, self.log.as_ref(), show_progress)
    }
}

/// Returns the session to `Idle` if the worker unwinds mid-scan
struct AbandonOnPanic(ScanSession);

impl Drop for AbandonOnPanic {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.abandon();
        }
    }
}

struct ScanJob {
    mode: ScanMode,
    roots: ScanRoots,
    classifier: Arc<CachePathClassifier>,
    policy: RiskPolicy,
    log: Arc<dyn ActivityLog>,
    session: ScanSession,
    tx: Sender<ScanEvent>,
}

impl ScanJob {
    fn emit(&self, event: ScanEvent) {
        // A caller that stopped listening still gets its session populated
        let _ = self.tx.send(event);
    }

    fn status(&self, message: &str) {
        tracing::info!("{}", message);
        self.log.record(message);
        self.emit(ScanEvent::Status(message.to_string()));
    }

    fn run(self) {
        let start = Instant::now();
        self.log.record(&format!("Scan started ({} mode)", self.mode));

        let mut aggregator = Aggregator::new();

        self.status("Scanning TEMP...");
        if let Some(temp) = self.roots.temp.as_ref().filter(|p| p.is_dir()) {
            aggregator.extend(walker::scan(temp));
        }

        if self.mode == ScanMode::Deep {
            self.status("Scanning cache locations (Deep)...");
            for base in self.roots.app_data_roots() {
                let classifier = &self.classifier;
                aggregator.extend(walker::scan_filtered(&base, |dir| {
                    classifier.is_safe_cache_dir(dir)
                }));
            }
        }

        let groups = aggregator.finish(&self.policy);
        let folder_count = groups.len();
        let total_bytes: u64 = groups.values().map(|g| g.total_bytes).sum();

        for (path, group) in groups {
            self.session.record(&path);
            self.emit(ScanEvent::Folder(group));
        }

        self.session.complete();

        let summary = format!(
            "Scan completed: {} folders, {:.2} MB in {:.1}s",
            folder_count,
            walker::bytes_to_mb(total_bytes),
            start.elapsed().as_secs_f64()
        );
        tracing::info!("{}", summary);
        self.log.record(&summary);
        self.emit(ScanEvent::Finished);
    }
}
