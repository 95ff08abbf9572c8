use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use cachesweep::cleaner::{CleanReport, Selection};
use cachesweep::cli::args::{Cli, Commands, ConfigAction, OutputFormat, TierArg};
use cachesweep::cli::output;
use cachesweep::common::config::Config;
use cachesweep::common::format;
use cachesweep::scanner::aggregate::FolderGroup;
use cachesweep::scanner::leftovers;
use cachesweep::scanner::risk::RiskTier;
use cachesweep::scanner::{ScanEvent, ScanMode, ScanOrchestrator};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let _guard = if cli.verbose { init_tracing() } else { None };

    match cli.command {
        Commands::Scan { mode, detailed } => cmd_scan(&cli, mode.map(Into::into), detailed),

        Commands::Clean {
            mode,
            ref folders,
            ref files,
            up_to,
            yes,
            dry_run,
        } => cmd_clean(&cli, mode.map(Into::into), folders, files, up_to, yes, dry_run),

        Commands::Leftovers => cmd_leftovers(&cli),

        Commands::Config { ref action } => cmd_config(action),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                cachesweep::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                cachesweep::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                cachesweep::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "cachesweep", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Debug tracing to stderr plus a daily file under ~/.cachesweep/logs
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cachesweep=debug"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).without_time();

    let (file_layer, guard) = match Config::init_dirs() {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(Config::logs_dir(), "cachesweep.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

/// Run a scan, following its events on a spinner
fn run_scan(orchestrator: &ScanOrchestrator, mode: ScanMode, show_progress: bool) -> Result<(Vec<FolderGroup>, f64)> {
    let start = Instant::now();
    let handle = orchestrator.run(mode)?;

    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut groups = Vec::new();
    for event in handle {
        match event {
            ScanEvent::Status(message) => {
                if let Some(ref pb) = pb {
                    pb.set_message(message);
                }
            }
            ScanEvent::Folder(group) => {
                groups.push(group);
                if let Some(ref pb) = pb {
                    pb.set_message(format!("{} folders found", groups.len()));
                }
            }
            ScanEvent::Finished => {}
        }
    }

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    Ok((groups, start.elapsed().as_secs_f64()))
}

fn cmd_scan(cli: &Cli, mode: Option<ScanMode>, detailed: bool) -> Result<()> {
    let config = Config::load()?;
    let mode = mode.unwrap_or(config.default_mode);
    let orchestrator = ScanOrchestrator::from_config(&config);
    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);

    let (groups, duration) = run_scan(&orchestrator, mode, show_progress)?;

    match cli.format {
        OutputFormat::Human => output::print_scan_results(&groups, mode, detailed, duration),
        OutputFormat::Json => output::print_scan_json(&groups, mode),
        OutputFormat::Quiet => output::print_scan_quiet(&groups),
    }

    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path))
    }
}

/// Turn command-line picks into a selection validated against the scan
fn build_selection(
    groups: &[FolderGroup],
    folders: &[PathBuf],
    files: &[PathBuf],
    up_to: Option<TierArg>,
) -> Result<Selection> {
    let mut selection = Selection::new();

    if let Some(tier) = up_to {
        let ceiling: RiskTier = tier.into();
        for group in groups.iter().filter(|g| g.risk <= ceiling) {
            selection.add_folder(group)?;
        }
    }

    for folder in folders {
        let folder = absolute(folder)?;
        let group = groups
            .iter()
            .find(|g| g.path == folder)
            .with_context(|| format!("Folder not found in scan results: {}", folder.display()))?;
        selection.add_folder(group)?;
    }

    for file in files {
        let file = absolute(file)?;
        let group = groups
            .iter()
            .find(|g| g.file(&file).is_some())
            .with_context(|| format!("File not found in scan results: {}", file.display()))?;
        selection.add_file(group, &file)?;
    }

    Ok(selection)
}

fn cmd_clean(
    cli: &Cli,
    mode: Option<ScanMode>,
    folders: &[PathBuf],
    files: &[PathBuf],
    up_to: Option<TierArg>,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load()?;
    let mode = mode.unwrap_or(config.default_mode);
    let orchestrator = ScanOrchestrator::from_config(&config);
    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);

    let (groups, _) = run_scan(&orchestrator, mode, show_progress)?;
    let selection = build_selection(&groups, folders, files, up_to)?;

    if selection.is_empty() {
        match cli.format {
            OutputFormat::Human => {
                if !cli.quiet {
                    println!("  {} Nothing selected. Use --folder, --file or --up-to.", "✨");
                }
            }
            OutputFormat::Json if dry_run => output::print_dry_run_json(&selection),
            OutputFormat::Json => output::print_clean_json(&CleanReport::default()),
            OutputFormat::Quiet => println!("0  0  {}", format::format_size(0)),
        }
        return Ok(());
    }

    if matches!(cli.format, OutputFormat::Human) && !cli.quiet {
        output::print_selection(&selection);
    }

    if dry_run {
        match cli.format {
            OutputFormat::Human => println!(
                "  {} Dry run: would remove {} ({}). No files modified.",
                "ℹ️",
                format::format_items(selection.len()),
                format::format_size(selection.total_bytes())
            ),
            OutputFormat::Json => output::print_dry_run_json(&selection),
            OutputFormat::Quiet => println!(
                "{}  {}",
                selection.len(),
                format::format_size(selection.total_bytes())
            ),
        }
        return Ok(());
    }

    // Prompt on stderr so stdout stays machine-readable
    if !yes {
        eprint!(
            "\n  {} Permanently remove {} ({})? [y/N] ",
            "❓",
            format::format_items(selection.len()),
            format::format_size(selection.total_bytes())
        );
        use std::io::Write;
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    let report = orchestrator.remove(&selection, show_progress)?;

    match cli.format {
        OutputFormat::Human => output::print_clean_report(&report),
        OutputFormat::Json => output::print_clean_json(&report),
        OutputFormat::Quiet => {
            println!(
                "{}  {}  {}",
                report.removed,
                report.skipped,
                format::format_size(report.bytes_freed)
            );
        }
    }

    Ok(())
}

// ─── Leftovers ────────────────────────────────────────────────────────────────

fn cmd_leftovers(cli: &Cli) -> Result<()> {
    let orchestrator = ScanOrchestrator::from_config(&Config::load()?);
    let found = leftovers::list_leftovers(orchestrator.roots());

    match cli.format {
        OutputFormat::Human => output::print_leftovers(&found),
        OutputFormat::Json => output::print_leftovers_json(&found),
        OutputFormat::Quiet => println!("{}", found.len()),
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            let config = Config::default();
            config.save()?;
            println!("  {} CacheSweep initialized at {}", "✓".green(), format::format_path(&Config::data_dir()));
            println!("  Created: config.toml, logs/");
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
            Ok(())
        }
    }
}
