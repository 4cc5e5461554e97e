// src/render.rs
// =============================================================================
// Terminal output for a DashboardView.
//
// Two formats:
// - table: one row per repository plus a page footer
// - JSON: the whole view, for scripts
//
// An empty view prints the active filters and a notice instead of a blank
// table, so "nothing matched" never looks like "something broke".
// =============================================================================

use anyhow::Result;
use clap::ValueEnum;

use crate::catalog::{DashboardView, EmptyReason, FilterCriteria};
use crate::enrich::EnrichedRecord;

// Column widths (in characters) for the table
const NAME_WIDTH: usize = 40;
const DEMO_WIDTH: usize = 45;

// Prints one screen, as a table or as pretty JSON
pub fn print_view(view: &DashboardView<'_>, json: bool) -> Result<()> {
    if json {
        // The view derives Serialize, so the JSON mirrors its fields
        let json_output = serde_json::to_string_pretty(view)?;
        println!("{}", json_output);
    } else {
        print_table(view);
    }
    Ok(())
}

// Prints the filter summary, then the rows or an empty-state notice
fn print_table(view: &DashboardView<'_>) {
    // Always say which filters are active, so an empty page is explainable
    println!("🔎 {}", describe_filters(view.criteria));

    // Empty view: one notice instead of a header with no rows
    if let Some(reason) = view.empty {
        match reason {
            EmptyReason::NoRepositories => {
                println!("📭 This organization has no repositories visible to you.")
            }
            EmptyReason::NoMatches => println!(
                "🙅 No matches: none of the {} repositories fit the current filters.",
                view.total_repositories
            ),
        }
        return;
    }

    // Header row
    println!();
    println!(
        "{:<name$} {:<10} {:<12} {:<demo$}",
        "NAME",
        "VISIBILITY",
        "UPDATED",
        "DEMO",
        name = NAME_WIDTH,
        demo = DEMO_WIDTH
    );
    println!("{}", "=".repeat(NAME_WIDTH + DEMO_WIDTH + 24));

    for item in &view.items {
        print_row(item);
    }

    // Footer: where we are and how much the filters left
    println!();
    println!(
        "📄 Page {} of {} ({} matching, {} total)",
        view.page, view.total_pages, view.total_matches, view.total_repositories
    );
}

// Prints one repository: a table line, its description, and its preview image
fn print_row(item: &EnrichedRecord) {
    let record = &item.record;
    // "2024-01-05T10:00:00Z" -> "2024-01-05"
    let updated: String = record.updated_at.chars().take(10).collect();
    let demo = item.enrichment.demo_url.as_deref().unwrap_or("-");

    println!(
        "{:<name$} {:<10} {:<12} {:<demo_w$}",
        truncate(&record.name, NAME_WIDTH),
        record.visibility.to_string(),
        updated,
        truncate(demo, DEMO_WIDTH),
        name = NAME_WIDTH,
        demo_w = DEMO_WIDTH
    );

    // Second line, indented under the name
    let description = record
        .description
        .as_deref()
        .unwrap_or("No description provided.");
    println!("    {}", truncate(description, NAME_WIDTH + DEMO_WIDTH + 20));

    // Terminals can't show images, so print the URL
    if let Some(image) = &item.enrichment.preview_image_url {
        println!("    🖼  {}", image);
    }
}

// One-line summary of the active filters, e.g.
//   sort: name-asc | visibility: all | search: "stock"
fn describe_filters(criteria: &FilterCriteria) -> String {
    // Search is trimmed before matching, so show it trimmed too
    let query = criteria.query.trim();
    let search = if query.is_empty() {
        "(none)".to_string()
    } else {
        format!("\"{}\"", query)
    };

    format!(
        "sort: {} | visibility: {} | search: {}",
        value_name(criteria.sort),
        value_name(criteria.visibility),
        search
    )
}

// The name the user types for a value, e.g. "name-asc"
fn value_name<T: ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|possible| possible.get_name().to_string())
        .unwrap_or_default()
}

// Shortens `text` to at most `width` characters, ending in "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SortKey;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_describe_filters() {
        let criteria = FilterCriteria {
            sort: SortKey::NameAsc,
            query: " stock ".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(
            describe_filters(&criteria),
            "sort: name-asc | visibility: all | search: \"stock\""
        );
    }
}
