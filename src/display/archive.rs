//! Archive display formatting
//!
//! Formats archive listings and run results for terminal output.

use chrono::{DateTime, Utc};

use crate::backup::{ArchiveFile, ArchiveReport, PrunePlan, PruneReport};

/// Format a list of archives as a table, oldest first
pub fn format_archive_list(archives: &[ArchiveFile], now: DateTime<Utc>) -> String {
    if archives.is_empty() {
        return "No archives found.".to_string();
    }

    let name_width = archives
        .iter()
        .map(|a| a.file_name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>10}  {:>6}  {}\n",
        "Name",
        "Size",
        "Age",
        "Modified",
        name_width = name_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:->10}  {:->6}  {:-<19}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for archive in archives {
        output.push_str(&format!(
            "{:<name_width$}  {:>10}  {:>6}  {}\n",
            archive.file_name,
            format_size(archive.size_bytes),
            format_age(now.signed_duration_since(archive.modified)),
            archive.modified.format("%Y-%m-%d %H:%M:%S"),
            name_width = name_width,
        ));
    }

    let total: u64 = archives.iter().map(|a| a.size_bytes).sum();
    output.push_str(&format!(
        "\nTotal: {} archive(s), {}",
        archives.len(),
        format_size(total)
    ));

    output
}

/// Format the outcome of archive creation
pub fn format_archive_report(report: &ArchiveReport) -> String {
    format!(
        "Backup created: {}\n  {} entries archived, {} excluded, {}",
        report.archive.path.display(),
        report.entries_archived,
        report.entries_excluded,
        format_size(report.archive.size_bytes)
    )
}

/// Format the outcome of a prune
pub fn format_prune_report(report: &PruneReport) -> String {
    let mut output = report.summary();

    for archive in &report.removed {
        output.push_str(&format!("\n  deleted {}", archive.file_name));
    }

    for failure in &report.failures {
        output.push_str(&format!(
            "\n  FAILED  {}: {}",
            failure.path.display(),
            failure.reason
        ));
    }

    output
}

/// Format a dry-run prune plan
pub fn format_prune_plan(plan: &PrunePlan, keep: usize) -> String {
    if plan.is_noop() {
        return format!(
            "No archives to prune ({} present, keeping {}).",
            plan.to_keep.len(),
            keep
        );
    }

    let mut output = format!(
        "Would delete {} of {} archive(s), keeping {}:",
        plan.to_remove.len(),
        plan.to_remove.len() + plan.to_keep.len(),
        keep
    );
    for archive in &plan.to_remove {
        output.push_str(&format!("\n  {}", archive.file_name));
    }
    output
}

/// Format a duration in human-readable form
pub fn format_age(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
