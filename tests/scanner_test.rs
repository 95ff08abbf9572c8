use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use cachesweep::cleaner::Selection;
use cachesweep::common::activity::{ActivityLog, NullActivityLog};
use cachesweep::common::errors::SweepError;
use cachesweep::common::safety::CachePathClassifier;
use cachesweep::scanner::aggregate::{self, FolderGroup};
use cachesweep::scanner::risk::{RiskPolicy, RiskTier};
use cachesweep::scanner::roots::ScanRoots;
use cachesweep::scanner::session::SessionState;
use cachesweep::scanner::walker::{self, bytes_to_mb};
use cachesweep::scanner::{ScanEvent, ScanMode, ScanOrchestrator};

const MB: u64 = 1024 * 1024;

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Create a file of the given logical size without writing its data
fn sparse(path: &Path, bytes: u64) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = File::create(path).unwrap();
    file.set_len(bytes).unwrap();
}

fn orchestrator(roots: ScanRoots) -> ScanOrchestrator {
    ScanOrchestrator::new(
        roots,
        CachePathClassifier::default(),
        RiskPolicy::default(),
        Arc::new(NullActivityLog),
    )
}

fn by_path(groups: &[FolderGroup], path: &Path) -> FolderGroup {
    groups
        .iter()
        .find(|g| g.path == path)
        .cloned()
        .unwrap_or_else(|| panic!("no group for {}", path.display()))
}

#[derive(Default)]
struct MemoryLog(Mutex<Vec<String>>);

impl ActivityLog for MemoryLog {
    fn record(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

/// Sink that blows up, taking the scan worker with it
struct ExplodingLog;

impl ActivityLog for ExplodingLog {
    fn record(&self, _message: &str) {
        panic!("sink exploded");
    }
}

// ─── Walker tests ─────────────────────────────────────────────────────────────

#[test]
fn test_walker_skips_empty_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("empty.tmp"), b"").unwrap();
    std::fs::write(dir.path().join("data.tmp"), b"hello").unwrap();
    std::fs::create_dir(dir.path().join("empty_dir")).unwrap();

    let entries: Vec<_> = walker::scan(dir.path()).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, dir.path().join("data.tmp"));
    assert_eq!(entries[0].size_bytes, 5);
}

#[test]
fn test_walker_recurses() {
    let dir = TempDir::new().unwrap();
    sparse(&dir.path().join("a/b/c/deep.bin"), 10);
    sparse(&dir.path().join("top.bin"), 10);

    let mut paths: Vec<PathBuf> = walker::scan(dir.path()).map(|e| e.path).collect();
    paths.sort();
    assert_eq!(
        paths,
        vec![dir.path().join("a/b/c/deep.bin"), dir.path().join("top.bin")]
    );
}

#[test]
fn test_filter_suppresses_reporting_not_descent() {
    let dir = TempDir::new().unwrap();
    sparse(&dir.path().join("App/Data/settings.bin"), 10);
    sparse(&dir.path().join("App/Data/Cache/blob.bin"), 10);

    let classifier = CachePathClassifier::default();
    let entries: Vec<_> =
        walker::scan_filtered(dir.path(), |d| classifier.is_safe_cache_dir(d)).collect();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, dir.path().join("App/Data/Cache/blob.bin"));
}

#[test]
fn test_sizes_use_binary_megabytes() {
    let dir = TempDir::new().unwrap();
    sparse(&dir.path().join("f.bin"), 3 * MB / 2);

    let entry = walker::scan(dir.path()).next().unwrap();
    assert_eq!(entry.size_mb(), 1.5);
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_and_dangling_link_skipped() {
    let dir = TempDir::new().unwrap();
    sparse(&dir.path().join("real.bin"), 10);
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

    let entries: Vec<_> = walker::scan(dir.path()).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, dir.path().join("real.bin"));
}

#[cfg(unix)]
#[test]
fn test_walker_absorbs_unreadable_directories() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    sparse(&dir.path().join("open/a.tmp"), 10);
    sparse(&dir.path().join("top.tmp"), 10);
    let locked = dir.path().join("locked");
    sparse(&locked.join("hidden.tmp"), 10);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through mode 000; nothing to observe then
    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut paths: Vec<PathBuf> = walker::scan(dir.path()).map(|e| e.path).collect();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    paths.sort();
    assert_eq!(
        paths,
        vec![dir.path().join("open/a.tmp"), dir.path().join("top.tmp")]
    );
}

// ─── Aggregation tests ────────────────────────────────────────────────────────

#[test]
fn test_group_totals_match_files() {
    let dir = TempDir::new().unwrap();
    sparse(&dir.path().join("g/1.bin"), 700_000);
    sparse(&dir.path().join("g/2.bin"), 900_001);
    sparse(&dir.path().join("h/1.bin"), 42);

    let groups = aggregate::group(walker::scan(dir.path()), &RiskPolicy::default());
    let g = &groups[dir.path().join("g").as_path()];

    assert_eq!(g.file_count, g.files.len());
    assert_eq!(g.file_count, 2);
    assert_eq!(g.total_bytes, 1_600_001);
    assert_eq!(g.total_size_mb, bytes_to_mb(1_600_001));
    assert_eq!(g.total_size_mb, 1.53);
}

// ─── Orchestrator tests ───────────────────────────────────────────────────────

#[test]
fn test_safe_scan_ignores_app_data() {
    let temp = TempDir::new().unwrap();
    let app = TempDir::new().unwrap();
    sparse(&temp.path().join("junk/a.tmp"), 1024);
    sparse(&app.path().join("SomeApp/Cache/c.bin"), 1024);

    let roots = ScanRoots {
        temp: Some(temp.path().to_path_buf()),
        local_app_data: Some(app.path().to_path_buf()),
        ..ScanRoots::default()
    };
    let groups = orchestrator(roots).scan_blocking(ScanMode::Safe).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].path, temp.path().join("junk"));
}

#[test]
fn test_deep_scan_only_reports_cache_locations() {
    let temp = TempDir::new().unwrap();
    let app = TempDir::new().unwrap();
    sparse(&temp.path().join("junk/a.tmp"), 1024);
    sparse(&app.path().join("SomeApp/Cache/c.bin"), 1024);
    sparse(&app.path().join("SomeApp/Data/settings.db"), 1024);
    sparse(&app.path().join("SomeApp/Data/logs/run.log"), 1024);
    sparse(&app.path().join("Google/Chrome/User Data/Default/Cache/x"), 1024);
    sparse(&app.path().join("tool/node_modules/.cache/y"), 1024);

    let roots = ScanRoots {
        temp: Some(temp.path().to_path_buf()),
        local_app_data: Some(app.path().to_path_buf()),
        roaming_app_data: Some(app.path().join("does-not-exist")),
        shared_app_data: None,
        program_dirs: Vec::new(),
    };
    let groups = orchestrator(roots).scan_blocking(ScanMode::Deep).unwrap();

    let mut paths: Vec<PathBuf> = groups.iter().map(|g| g.path.clone()).collect();
    paths.sort();
    let mut expected = vec![
        temp.path().join("junk"),
        app.path().join("SomeApp/Cache"),
        app.path().join("SomeApp/Data/logs"),
    ];
    expected.sort();
    assert_eq!(paths, expected);
}

#[test]
fn test_overlapping_roots_do_not_double_count() {
    let root = TempDir::new().unwrap();
    sparse(&root.path().join("Temp/x.tmp"), 2048);

    // Temp lives inside local app data, as it does on Windows
    let roots = ScanRoots {
        temp: Some(root.path().join("Temp")),
        local_app_data: Some(root.path().to_path_buf()),
        ..ScanRoots::default()
    };
    let groups = orchestrator(roots).scan_blocking(ScanMode::Deep).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].file_count, 1);
    assert_eq!(groups[0].total_bytes, 2048);
}

#[test]
fn test_missing_temp_root_yields_empty_scan() {
    let dir = TempDir::new().unwrap();
    let scan = orchestrator(ScanRoots::temp_only(dir.path().join("gone")));
    let groups = scan.scan_blocking(ScanMode::Deep).unwrap();
    assert!(groups.is_empty());
    assert_eq!(scan.session().state(), SessionState::PendingReview);
}

#[test]
fn test_events_end_with_finished() {
    let temp = TempDir::new().unwrap();
    sparse(&temp.path().join("one/a"), 10);
    sparse(&temp.path().join("two/b"), 10);

    let scan = orchestrator(ScanRoots::temp_only(temp.path()));
    let events: Vec<ScanEvent> = scan.run(ScanMode::Safe).unwrap().collect();

    let folders = events
        .iter()
        .filter(|e| matches!(e, ScanEvent::Folder(_)))
        .count();
    assert_eq!(folders, 2);
    assert!(matches!(events.first(), Some(ScanEvent::Status(_))));
    assert!(matches!(events.last(), Some(ScanEvent::Finished)));
    assert_eq!(scan.session().folders().len(), 2);
}

#[test]
fn test_milestones_logged() {
    let temp = TempDir::new().unwrap();
    let log = Arc::new(MemoryLog::default());
    let scan = ScanOrchestrator::new(
        ScanRoots::temp_only(temp.path()),
        CachePathClassifier::default(),
        RiskPolicy::default(),
        log.clone(),
    );
    scan.scan_blocking(ScanMode::Deep).unwrap();

    let lines = log.0.lock().unwrap().clone();
    assert!(lines[0].starts_with("Scan started (deep mode)"));
    assert!(lines.iter().any(|l| l.contains("Scanning TEMP")));
    assert!(lines.iter().any(|l| l.contains("Scanning cache locations")));
    assert!(lines.last().unwrap().starts_with("Scan completed"));
}

// ─── Single-flight session tests ──────────────────────────────────────────────

#[test]
fn test_second_scan_refused_until_reviewed() {
    let temp = TempDir::new().unwrap();
    sparse(&temp.path().join("junk/a"), 10);
    let scan = orchestrator(ScanRoots::temp_only(temp.path()));

    let handle = scan.run(ScanMode::Safe).unwrap();
    assert_eq!(scan.run(ScanMode::Safe).err(), Some(SweepError::ScanInProgress));
    let groups = handle.wait();
    assert_eq!(groups.len(), 1);

    // Completed but unreviewed
    assert_eq!(scan.session().state(), SessionState::PendingReview);
    assert_eq!(scan.run(ScanMode::Deep).err(), Some(SweepError::ScanInProgress));
    assert_eq!(scan.session().folders().len(), 1);

    // An empty removal pass still counts as review
    let report = scan.remove(&Selection::new(), false).unwrap();
    assert_eq!(report.removed, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(scan.session().state(), SessionState::Idle);

    assert!(scan.run(ScanMode::Safe).is_ok());
}

#[test]
fn test_crashed_scan_does_not_block_the_next_one() {
    let temp = TempDir::new().unwrap();
    sparse(&temp.path().join("junk/a"), 10);
    let scan = ScanOrchestrator::new(
        ScanRoots::temp_only(temp.path()),
        CachePathClassifier::default(),
        RiskPolicy::default(),
        Arc::new(ExplodingLog),
    );

    let groups = scan.scan_blocking(ScanMode::Safe).unwrap();
    assert!(groups.is_empty());
    assert_eq!(scan.session().state(), SessionState::Idle);
    assert_eq!(
        scan.remove(&Selection::new(), false).unwrap_err(),
        SweepError::NoPendingResults
    );
    assert!(scan.run(ScanMode::Safe).is_ok());
}

#[test]
fn test_removal_without_scan_refused() {
    let scan = orchestrator(ScanRoots::default());
    let err = scan.remove(&Selection::new(), false).unwrap_err();
    assert_eq!(err, SweepError::NoPendingResults);
}

// ─── End to end ───────────────────────────────────────────────────────────────

#[test]
fn test_tiered_scan_then_mixed_removal() {
    let temp = TempDir::new().unwrap();
    sparse(&temp.path().join("small/a.bin"), 40 * MB);
    sparse(&temp.path().join("medium/b.bin"), 150 * MB);
    sparse(&temp.path().join("large/c1.bin"), 200 * MB);
    sparse(&temp.path().join("large/c2.bin"), 200 * MB);
    sparse(&temp.path().join("large/c3.bin"), 200 * MB);

    let scan = orchestrator(ScanRoots::temp_only(temp.path()));
    let mut groups = scan.scan_blocking(ScanMode::Safe).unwrap();
    groups.sort_by(|a, b| a.total_bytes.cmp(&b.total_bytes));

    let tiers: Vec<RiskTier> = groups.iter().map(|g| g.risk).collect();
    assert_eq!(tiers, vec![RiskTier::Low, RiskTier::Review, RiskTier::High]);
    assert_eq!(groups[0].total_size_mb, 40.0);
    assert_eq!(groups[1].total_size_mb, 150.0);
    assert_eq!(groups[2].total_size_mb, 600.0);

    let small = by_path(&groups, &temp.path().join("small"));
    let medium = by_path(&groups, &temp.path().join("medium"));
    let large = by_path(&groups, &temp.path().join("large"));

    let mut selection = Selection::new();
    selection.add_folder(&small).unwrap();
    selection.add_folder(&medium).unwrap();
    assert!(matches!(
        selection.add_folder(&large),
        Err(SweepError::WholeFolderNotAllowed { .. })
    ));
    selection.add_file(&large, &temp.path().join("large/c1.bin")).unwrap();
    selection.add_file(&large, &temp.path().join("large/c2.bin")).unwrap();

    let report = scan.remove(&selection, false).unwrap();
    assert_eq!(report.removed, 4);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.bytes_freed, 590 * MB);

    assert!(!temp.path().join("small").exists());
    assert!(!temp.path().join("medium").exists());
    assert!(!temp.path().join("large/c1.bin").exists());
    assert!(!temp.path().join("large/c2.bin").exists());
    assert!(temp.path().join("large/c3.bin").exists());
    assert_eq!(scan.session().state(), SessionState::Idle);
}
