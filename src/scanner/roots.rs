use std::path::PathBuf;

/// Platform-provided scan inputs. Every root is optional; roots that are
/// unset or missing on disk are skipped by the scanners.
#[derive(Debug, Clone, Default)]
pub struct ScanRoots {
    /// System temporary-files directory
    pub temp: Option<PathBuf>,
    /// Local (machine-bound) application data
    pub local_app_data: Option<PathBuf>,
    /// Roaming (per-user, synced) application data
    pub roaming_app_data: Option<PathBuf>,
    /// Shared application data for all users
    pub shared_app_data: Option<PathBuf>,
    /// Program installation directories, only ever listed
    pub program_dirs: Vec<PathBuf>,
}

impl ScanRoots {
    /// Resolve roots from the environment, falling back to the platform
    /// directories where the Windows variables are absent.
    pub fn detect() -> Self {
        Self {
            temp: Some(std::env::temp_dir()),
            local_app_data: env_dir("LOCALAPPDATA").or_else(dirs::data_local_dir),
            roaming_app_data: env_dir("APPDATA").or_else(dirs::data_dir),
            shared_app_data: env_dir("PROGRAMDATA"),
            program_dirs: dedup([env_dir("ProgramFiles"), env_dir("ProgramFiles(x86)")]),
        }
    }

    /// Only a temp root, for scanning an explicit directory
    pub fn temp_only(temp: impl Into<PathBuf>) -> Self {
        Self {
            temp: Some(temp.into()),
            ..Self::default()
        }
    }

    /// Local, roaming and shared roots that exist, each listed once
    pub fn app_data_roots(&self) -> Vec<PathBuf> {
        dedup([
            self.local_app_data.clone(),
            self.roaming_app_data.clone(),
            self.shared_app_data.clone(),
        ])
        .into_iter()
        .filter(|p| p.is_dir())
        .collect()
    }

    /// Roots inspected for leftover application folders
    pub fn leftover_roots(&self) -> Vec<PathBuf> {
        let mut roots = dedup([self.roaming_app_data.clone(), self.local_app_data.clone()]);
        for dir in &self.program_dirs {
            if !roots.contains(dir) {
                roots.push(dir.clone());
            }
        }
        roots.into_iter().filter(|p| p.is_dir()).collect()
    }
}

fn env_dir(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn dedup<const N: usize>(candidates: [Option<PathBuf>; N]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(N);
    for path in candidates.into_iter().flatten() {
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}
