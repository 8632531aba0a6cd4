//! Queue-level results: progress, skip, bulk create and sync.

use crate::queue::{BulkOutcome, QueueStats, SkipOutcome};
use crate::sync::SyncReport;

pub fn format_stats_text(stats: &QueueStats) -> String {
    format!(
        "## Progress\n- Passing: {}/{} ({:.1}%)\n- In Progress: {}\n- Remaining: {}",
        stats.passing, stats.total, stats.percentage, stats.in_progress, stats.remaining
    )
}

pub fn format_skip_text(outcome: &SkipOutcome) -> String {
    format!(
        "Feature skipped: **{}** (ID: {})\n- Old priority: {}\n- New priority: {}\n- Moved to end of queue",
        outcome.name, outcome.id, outcome.old_priority, outcome.new_priority
    )
}

pub fn format_bulk_text(outcome: &BulkOutcome) -> String {
    format!("Created {} features", outcome.created)
}

pub fn format_sync_text(report: &SyncReport) -> String {
    let mut text = format!(
        "## Specs Synced\n- Added: {}\n- Updated: {}\n- Unchanged: {}\n- Total specs: {}",
        report.added, report.updated, report.unchanged, report.total
    );
    if report.skipped > 0 {
        text.push_str(&format!("\n- Skipped (parse errors): {}", report.skipped));
    }
    text
}
