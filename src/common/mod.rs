pub mod activity;
pub mod config;
pub mod errors;
pub mod format;
pub mod safety;

pub use activity::{ActivityLog, FileActivityLog, NullActivityLog};
pub use errors::SweepError;
pub use safety::CachePathClassifier;
