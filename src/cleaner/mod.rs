pub mod engine;
pub mod remover;
pub mod selection;

pub use engine::{clean, remove_all, CleanReport};
pub use remover::{remove_path, RemovalOutcome, RemovalReason};
pub use selection::{RemovalTarget, Selection, TargetKind};
