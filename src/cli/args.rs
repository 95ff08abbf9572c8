use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scanner::risk::RiskTier;
use crate::scanner::ScanMode;

/// CacheSweep — reclaim disk space from caches and temp files
#[derive(Parser, Debug)]
#[command(
    name = "cachesweep",
    version,
    about = "A profile-safe cache and temp-file cleanup utility",
    long_about = "CacheSweep finds disposable cache and temporary data and removes it\n\
                   without touching programs, browser profiles, or user data.",
    after_help = "EXAMPLES:\n  \
        cachesweep scan                              Scan the temp directory\n  \
        cachesweep scan --mode deep --detailed       Also scan app-data caches, list High-risk files\n  \
        cachesweep clean --up-to low --yes           Remove every Low-risk folder\n  \
        cachesweep clean --folder <DIR>              Remove one Low/Review folder\n  \
        cachesweep clean --mode deep --file <FILE>   Remove one file from a High-risk folder\n  \
        cachesweep leftovers                         List leftover application folders\n  \
        cachesweep config show                       Show configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose diagnostics on stderr and in the logs directory
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan for removable cache and temp folders
    Scan {
        /// Scan mode (defaults to the configured mode)
        #[arg(long, short)]
        mode: Option<ModeArg>,

        /// List the individual files of High-risk folders
        #[arg(long)]
        detailed: bool,
    },

    /// Scan, then remove the selected folders and files
    Clean {
        /// Scan mode (defaults to the configured mode)
        #[arg(long, short)]
        mode: Option<ModeArg>,

        /// Remove a Low or Review folder as a whole (repeatable)
        #[arg(long = "folder", value_name = "PATH")]
        folders: Vec<PathBuf>,

        /// Remove one file from a High-risk folder (repeatable)
        #[arg(long = "file", value_name = "PATH")]
        files: Vec<PathBuf>,

        /// Select every folder at or below this risk tier
        #[arg(long, value_name = "TIER")]
        up_to: Option<TierArg>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Show what would be removed without removing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List top-level app-data and program folders for manual review
    Leftovers,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Initialize CacheSweep directories and default config
    Init,

    /// Print the config file location
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// System temp directory only
    Safe,
    /// Temp directory plus application-data cache locations
    Deep,
}

impl From<ModeArg> for ScanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Safe => ScanMode::Safe,
            ModeArg::Deep => ScanMode::Deep,
        }
    }
}

/// Tiers that may be selected as whole folders
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TierArg {
    Low,
    Review,
}

impl From<TierArg> for RiskTier {
    fn from(tier: TierArg) -> Self {
        match tier {
            TierArg::Low => RiskTier::Low,
            TierArg::Review => RiskTier::Review,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
