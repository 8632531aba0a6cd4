//! Init command presentation.

use crate::init::InitSummary;

pub fn format_init_summary(summary: &InitSummary) -> String {
    let mut output = String::from("Initializing backlog project...\n\n");
    for path in &summary.created {
        output.push_str(&format!("  ✓ {}\n", path));
    }
    for path in &summary.skipped {
        output.push_str(&format!("  ⊘ {} (already exists, skipped)\n", path));
    }
    output.push_str("\nAdd markdown specs to the specs directory, then run 'backlog sync'.");
    output
}
