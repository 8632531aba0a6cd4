//! Feature presentation: markdown blocks for agents and a status board for
//! people.

use super::shared::section_heading;
use crate::api::{FeatureBoard, FeatureView, NextFeature, SpecContext};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

/// One feature as markdown, optionally followed by its descriptor.
pub fn format_feature_markdown(feature: &FeatureView, spec: Option<&SpecContext>) -> String {
    let mut lines: Vec<String> = vec![
        format!(
            "**ID:** {} | **Priority:** {} | **Category:** {} | **Status:** {}",
            feature.id,
            feature.priority,
            feature.category,
            feature.status()
        ),
        String::new(),
        format!("### {}", feature.name),
        String::new(),
        feature.description.clone(),
        String::new(),
        "### Test Steps".to_string(),
    ];
    lines.extend(numbered(&feature.steps));

    if let Some(spec) = spec {
        lines.extend([
            String::new(),
            "### Spec File".to_string(),
            format!("`{}`", spec.filepath.display()),
        ]);
        if !spec.description.is_empty() {
            lines.extend([
                String::new(),
                "### Spec Description".to_string(),
                spec.description.clone(),
            ]);
        }
        if !spec.steps.is_empty() {
            lines.extend([String::new(), "### Spec Steps".to_string()]);
            lines.extend(numbered(&spec.steps));
        }
    }

    lines.join("\n")
}

fn numbered(steps: &[String]) -> impl Iterator<Item = String> + '_ {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
}

pub fn format_next_text(next: &NextFeature) -> String {
    format!(
        "## Next Feature\n\n{}",
        format_feature_markdown(&next.feature, next.spec.as_ref())
    )
}

pub fn format_feature_text(feature: &FeatureView) -> String {
    format_feature_markdown(feature, None)
}

pub fn format_regression_text(features: &[FeatureView]) -> String {
    if features.is_empty() {
        return "## Regression Features\n\nNo passing features available for regression testing."
            .to_string();
    }
    let blocks: Vec<String> = features
        .iter()
        .map(|f| format_feature_markdown(f, None))
        .collect();
    format!(
        "## Regression Features ({} selected)\n\n{}",
        features.len(),
        blocks.join("\n\n---\n\n")
    )
}

/// Confirmation line for a status change.
pub fn format_transition_text(action: &str, feature: &FeatureView) -> String {
    format!("{}: **{}** (ID: {})", action, feature.name, feature.id)
}

pub fn format_board_text(board: &FeatureBoard) -> String {
    let mut out = String::new();
    for (title, bucket) in [
        ("Pending", &board.pending),
        ("In Progress", &board.in_progress),
        ("Done", &board.done),
    ] {
        out.push_str(&section_heading(&format!("{} ({})", title, bucket.len())));
        out.push('\n');
        if bucket.is_empty() {
            out.push_str("  (none)\n\n");
            continue;
        }
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["ID", "Priority", "Category", "Name"]);
        for feature in bucket {
            table.add_row(vec![
                feature.id.to_string(),
                feature.priority.to_string(),
                feature.category.clone(),
                feature.name.clone(),
            ]);
        }
        out.push_str(&table.to_string());
        out.push_str("\n\n");
    }
    out.trim_end().to_string()
}
