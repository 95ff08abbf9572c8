use std::path::Path;

/// Path fragments that mark system, program, browser-profile, IDE, or
/// dependency-manager locations. A path containing any of these is never
/// treated as cache.
pub const DEFAULT_FORBIDDEN_KEYWORDS: &[&str] = &[
    r"\windows",
    r"\system32",
    r"\program files",
    r"\program files (x86)",
    r"\programs",
    r"\python",
    r"\pip",
    r"\microsoft",
    r"\google",
    r"\mozilla",
    r"\user data",
    r"\profiles",
    r"\extensions",
    r"\local storage",
    r"\indexeddb",
    r"\service worker",
    r"\node_modules",
    r"\vscode",
    r"\code\user",
];

/// Path fragments that indicate disposable cache data
pub const DEFAULT_CACHE_INDICATORS: &[&str] = &[
    "cache",
    "code cache",
    "gpucache",
    "crashpad",
    "shadercache",
    "temp",
    "logs",
];

/// Decides whether a path is an allowed cache location.
///
/// Matching is a case-insensitive substring test. Forward slashes are
/// folded to backslashes for comparison only, so the same keyword list
/// works on every platform.
#[derive(Debug, Clone)]
pub struct CachePathClassifier {
    forbidden: Vec<String>,
    indicators: Vec<String>,
}

impl Default for CachePathClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_FORBIDDEN_KEYWORDS.iter().map(|s| s.to_string()),
            DEFAULT_CACHE_INDICATORS.iter().map(|s| s.to_string()),
        )
    }
}

impl CachePathClassifier {
    pub fn new<F, I>(forbidden: F, indicators: I) -> Self
    where
        F: IntoIterator<Item = String>,
        I: IntoIterator<Item = String>,
    {
        Self {
            forbidden: forbidden.into_iter().map(|k| normalize(&k)).collect(),
            indicators: indicators.into_iter().map(|k| normalize(&k)).collect(),
        }
    }

    /// Forbidden keywords always win over cache indicators
    pub fn is_safe_cache_path(&self, path: &str) -> bool {
        let p = normalize(path);

        if self.forbidden.iter().any(|k| p.contains(k.as_str())) {
            return false;
        }

        self.indicators.iter().any(|k| p.contains(k.as_str()))
    }

    pub fn is_safe_cache_dir(&self, path: &Path) -> bool {
        self.is_safe_cache_path(&path.to_string_lossy())
    }
}

fn normalize(s: &str) -> String {
    s.to_lowercase().replace('/', "\\")
}
