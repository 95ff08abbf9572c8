use serde::{Deserialize, Serialize};

/// Coarse severity of a folder group, derived from its total size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Small enough to remove as a whole
    Low,
    /// Removable as a whole, worth a look first
    Review,
    /// Too large for whole-folder removal; files must be picked individually
    High,
}

impl RiskTier {
    pub fn allows_whole_folder_removal(self) -> bool {
        !matches!(self, RiskTier::High)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Review => write!(f, "Review"),
            RiskTier::High => write!(f, "High"),
        }
    }
}

/// Size thresholds in megabytes. Both bounds are exclusive:
/// `size > high` is High, `review < size <= high` is Review, anything else Low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPolicy {
    pub review_above_mb: f64,
    pub high_above_mb: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            review_above_mb: 100.0,
            high_above_mb: 500.0,
        }
    }
}

impl RiskPolicy {
    pub fn new(review_above_mb: f64, high_above_mb: f64) -> Self {
        Self {
            review_above_mb,
            high_above_mb,
        }
    }

    pub fn classify(&self, total_size_mb: f64) -> RiskTier {
        if total_size_mb > self.high_above_mb {
            RiskTier::High
        } else if total_size_mb > self.review_above_mb {
            RiskTier::Review
        } else {
            RiskTier::Low
        }
    }
}

/// Classify with the default thresholds
pub fn classify(total_size_mb: f64) -> RiskTier {
    RiskPolicy::default().classify(total_size_mb)
}
