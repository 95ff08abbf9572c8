use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::activity::FileActivityLog;
use crate::common::safety::{CachePathClassifier, DEFAULT_CACHE_INDICATORS, DEFAULT_FORBIDDEN_KEYWORDS};
use crate::scanner::risk::RiskPolicy;
use crate::scanner::ScanMode;

/// Global CacheSweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scan mode used when none is given on the command line
    #[serde(default)]
    pub default_mode: ScanMode,

    /// Groups above this size (MB) need review
    #[serde(default = "default_review_mb")]
    pub review_threshold_mb: f64,

    /// Groups above this size (MB) are High risk and file-by-file only
    #[serde(default = "default_high_mb")]
    pub high_threshold_mb: f64,

    /// Substrings that disqualify a path from being treated as cache
    #[serde(default = "default_forbidden")]
    pub forbidden_keywords: Vec<String>,

    /// Substrings that mark a path as a cache location
    #[serde(default = "default_indicators")]
    pub cache_indicators: Vec<String>,

    /// Activity log location (append-only)
    #[serde(default)]
    pub activity_log: Option<PathBuf>,
}

fn default_review_mb() -> f64 {
    100.0
}
fn default_high_mb() -> f64 {
    500.0
}
fn default_forbidden() -> Vec<String> {
    DEFAULT_FORBIDDEN_KEYWORDS.iter().map(|s| s.to_string()).collect()
}
fn default_indicators() -> Vec<String> {
    DEFAULT_CACHE_INDICATORS.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: ScanMode::default(),
            review_threshold_mb: default_review_mb(),
            high_threshold_mb: default_high_mb(),
            forbidden_keywords: default_forbidden(),
            cache_indicators: default_indicators(),
            activity_log: None,
        }
    }
}

impl Config {
    /// Get the CacheSweep data directory (~/.cachesweep)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".cachesweep")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the diagnostics logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from file, or fall back to defaults if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        Self::init_dirs()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize all CacheSweep directories
    pub fn init_dirs() -> Result<()> {
        for dir in [Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Thresholds must keep the High tier reachable
    pub fn validate(&self) -> Result<()> {
        let (review, high) = (self.review_threshold_mb, self.high_threshold_mb);
        ensure!(
            review.is_finite() && high.is_finite(),
            "risk thresholds must be finite (review_threshold_mb = {}, high_threshold_mb = {})",
            review,
            high
        );
        ensure!(
            0.0 <= review && review <= high,
            "risk thresholds must satisfy 0 <= review_threshold_mb <= high_threshold_mb (got {} and {})",
            review,
            high
        );
        Ok(())
    }

    /// Resolved activity log path
    pub fn activity_log_path(&self) -> PathBuf {
        self.activity_log
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("cleaner.log"))
    }

    pub fn activity_log(&self) -> FileActivityLog {
        FileActivityLog::new(self.activity_log_path())
    }

    pub fn risk_policy(&self) -> RiskPolicy {
        RiskPolicy::new(self.review_threshold_mb, self.high_threshold_mb)
    }

    pub fn classifier(&self) -> CachePathClassifier {
        CachePathClassifier::new(self.forbidden_keywords.clone(), self.cache_indicators.clone())
    }
}
