use serde::Serialize;
use std::path::PathBuf;

use super::risk::RiskTier;
use super::roots::ScanRoots;

/// A top-level application folder that may have outlived its program.
///
/// Leftovers are listed for the user to inspect; they are never sized,
/// never treated as cache, and never selected for removal automatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leftover {
    pub path: PathBuf,
    pub risk: RiskTier,
}

/// List the direct subdirectories of the app-data and program roots
pub fn list_leftovers(roots: &ScanRoots) -> Vec<Leftover> {
    let mut results = Vec::new();

    for base in roots.leftover_roots() {
        let entries = match std::fs::read_dir(&base) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(root = %base.display(), error = %e, "cannot list leftover root");
                continue;
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();

        results.extend(dirs.into_iter().map(|path| Leftover {
            path,
            risk: RiskTier::Review,
        }));
    }

    results
}
