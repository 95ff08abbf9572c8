//! # CacheSweep
//!
//! A profile-safe cache and temp-file cleanup utility.
//!
//! CacheSweep finds disposable cache and temporary data and removes it
//! without touching programs, browser profiles, or user data. It features:
//!
//! - **Safe mode**: scans the system temp directory only
//! - **Deep mode**: also scans application-data roots, restricted to cache locations
//! - **Risk tiers**: folder groups are tiered Low / Review / High by size
//! - **No bulk surprises**: High-tier folders can only be cleaned file by file
//! - **Never raises on removal**: every failure becomes a per-item outcome
//! - **100% Offline**: append-only local activity log, nothing else

pub mod cli;
pub mod cleaner;
pub mod common;
pub mod scanner;
