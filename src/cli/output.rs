use colored::*;

use crate::cleaner::{CleanReport, Selection, TargetKind};
use crate::common::format::{self, format_mb, format_path, format_size, format_tier};
use crate::scanner::aggregate::FolderGroup;
use crate::scanner::leftovers::Leftover;
use crate::scanner::risk::RiskTier;
use crate::scanner::walker::bytes_to_mb;
use crate::scanner::ScanMode;

/// Groups ordered largest first, the way results are reviewed
pub fn sorted_by_size(groups: &[FolderGroup]) -> Vec<&FolderGroup> {
    let mut sorted: Vec<&FolderGroup> = groups.iter().collect();
    sorted.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    sorted
}

/// Print scan results in human-readable format
pub fn print_scan_results(groups: &[FolderGroup], mode: ScanMode, detailed: bool, duration_secs: f64) {
    let total_bytes: u64 = groups.iter().map(|g| g.total_bytes).sum();
    let file_total: usize = groups.iter().map(|g| g.file_count).sum();

    println!();
    println!("{}  CacheSweep Scan Results ({} mode)", "🧹", mode);
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  Scanned in {}  •  {} found  •  {} in {} folders",
        format::format_duration(duration_secs).cyan(),
        format_mb(bytes_to_mb(total_bytes)).bold(),
        format::format_count(file_total).dimmed(),
        groups.len()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if groups.is_empty() {
        println!("  {} Nothing to clean!", "✨");
        return;
    }

    for tier in [RiskTier::High, RiskTier::Review, RiskTier::Low] {
        let tiered: Vec<&FolderGroup> = sorted_by_size(groups)
            .into_iter()
            .filter(|g| g.risk == tier)
            .collect();
        if tiered.is_empty() {
            continue;
        }

        let tier_bytes: u64 = tiered.iter().map(|g| g.total_bytes).sum();
        let heading = match tier {
            RiskTier::High => "High risk — select files individually",
            RiskTier::Review => "Review recommended",
            RiskTier::Low => "Low risk",
        };
        println!(
            "  {} {} ({})",
            "●".color(tier_color(tier)),
            heading.color(tier_color(tier)).bold(),
            format_mb(bytes_to_mb(tier_bytes))
        );
        println!();
        for group in tiered {
            print_group(group, detailed);
        }
        println!();
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} Run {} to remove folders, {} for High-risk files",
        "💡",
        "cachesweep clean --folder <PATH>".cyan(),
        "--file <PATH>".cyan()
    );
    println!();
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Review => Color::Yellow,
        RiskTier::High => Color::Red,
    }
}

fn print_group(group: &FolderGroup, detailed: bool) {
    println!(
        "    {:<32} {:>12}  {:>10}  {}",
        format::truncate(&group.name(), 32),
        format_mb(group.total_size_mb),
        format::format_count(group.file_count).dimmed(),
        format_tier(group.risk)
    );
    println!("      {} {}", "↳".dimmed(), format_path(&group.path).dimmed());

    // Only High groups expose their files; the rest go as a whole
    if detailed && group.risk == RiskTier::High {
        for file in &group.files {
            println!(
                "        {} {} ({})",
                "•".dimmed(),
                format_path(&file.path).dimmed(),
                format_mb(file.size_mb()).dimmed()
            );
        }
    }
}

fn group_json(group: &FolderGroup) -> serde_json::Value {
    let mut value = serde_json::json!({
        "path": group.path,
        "total_size_mb": group.total_size_mb,
        "file_count": group.file_count,
        "risk": group.risk,
    });
    if group.risk == RiskTier::High {
        value["files"] = serde_json::json!(group
            .files
            .iter()
            .map(|f| serde_json::json!({ "path": f.path, "size_mb": f.size_mb() }))
            .collect::<Vec<_>>());
    }
    value
}

/// Print scan results as JSON
pub fn print_scan_json(groups: &[FolderGroup], mode: ScanMode) {
    let total_bytes: u64 = groups.iter().map(|g| g.total_bytes).sum();
    let json = serde_json::json!({
        "mode": mode,
        "total_size_mb": bytes_to_mb(total_bytes),
        "folders": sorted_by_size(groups).into_iter().map(group_json).collect::<Vec<_>>(),
    });
    match serde_json::to_string_pretty(&json) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

/// Print a minimal summary
pub fn print_scan_quiet(groups: &[FolderGroup]) {
    let total_bytes: u64 = groups.iter().map(|g| g.total_bytes).sum();
    println!(
        "{}  {}  {}",
        format_size(total_bytes),
        groups.iter().map(|g| g.file_count).sum::<usize>(),
        groups.len()
    );
}

/// Print what a removal pass is about to touch
pub fn print_selection(selection: &Selection) {
    println!();
    println!("  {} Selected for removal:", "🗑️");
    for target in selection.targets() {
        let kind = match target.kind {
            TargetKind::WholeFolder => "folder",
            TargetKind::FileInHighFolder => "file",
        };
        println!(
            "    {} {:<6} {} ({})",
            "•".dimmed(),
            kind.dimmed(),
            format_path(&target.path),
            format_size(target.size_bytes).dimmed()
        );
    }
}

/// Print what a dry run would remove, as JSON
pub fn print_dry_run_json(selection: &Selection) {
    let json = serde_json::json!({
        "dry_run": true,
        "targets": selection.targets(),
        "total_bytes": selection.total_bytes(),
    });
    match serde_json::to_string_pretty(&json) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing selection: {}", e),
    }
}

/// Print a removal pass report
pub fn print_clean_report(report: &CleanReport) {
    println!();
    println!("  {} {}", "✓".green(), "Cleanup completed".bold());
    println!();
    println!("    Removed: {}", format::format_items(report.removed).green());
    println!("    Skipped: {}", format::format_items(report.skipped).yellow());
    println!("    Freed:   {}", format_size(report.bytes_freed).cyan());

    if report.skipped > 0 {
        println!();
        for outcome in report.skipped_outcomes() {
            println!(
                "    {} {} — {}",
                "→".dimmed(),
                format_path(&outcome.path).dimmed(),
                outcome.reason.to_string().yellow()
            );
        }
    }

    println!();
    println!("  {} {}", "ℹ️", "Cleanup finished. You can scan again.".dimmed());
    println!();
}

/// Print a removal pass report as JSON
pub fn print_clean_json(report: &CleanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Print leftover application folders
pub fn print_leftovers(leftovers: &[Leftover]) {
    println!();
    println!("{}  Leftover application folders", "📂");
    println!("{}", "─".repeat(60).dimmed());

    if leftovers.is_empty() {
        println!("  {} No leftover folders found", "✨");
        println!();
        return;
    }

    for leftover in leftovers {
        println!(
            "    {:<8} {}",
            format_tier(leftover.risk),
            format_path(&leftover.path)
        );
    }
    println!();
    println!(
        "  {} {}",
        "ℹ️",
        "Listed for manual review only. Nothing here is removed automatically.".dimmed()
    );
    println!();
}

pub fn print_leftovers_json(leftovers: &[Leftover]) {
    match serde_json::to_string_pretty(leftovers) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing leftovers: {}", e),
    }
}
