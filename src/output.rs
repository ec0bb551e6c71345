//! CLI output formatting for fetch, generate and watch.
//!
//! Output is a content inventory: each channel is listed with its items by
//! position and title, and generate reports what each view contains rather
//! than which files were touched.
//!
//! # Output Format
//!
//! ## Fetch
//!
//! ```text
//! Publication (2 items)
//!     001 Book launch
//!         Created: 2024-05-01
//!     002 (block 1842)
//!         Created: 2024-04-12
//! Archive (0 items)
//!     empty or unavailable
//! Film (1 item)
//!     001 Trailer
//!         Created: 2024-03-01
//!
//! Fetched 3 items
//! ```
//!
//! ## Generate
//!
//! ```text
//! All → 17 rows, 3 highlights, 20 in gallery
//! Publication → 4 rows, 2 in grid, 6 in gallery
//! Film → 1 row, 0 in grid, 1 in gallery
//! Archive → 12 rows, 3 in grid, 15 in gallery
//! Assets: 6 files
//!
//! Generated index.html (7 written)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::generate::GenerateReport;
use crate::types::{Category, CollectionState, ContentItem, Selector};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_title(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// Titled items show their title, untitled ones their block id.
///
/// ```text
/// 001 Book launch
/// 002 (block 1842)
/// ```
fn item_line(index: usize, item: &ContentItem) -> String {
    match item.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), truncate_title(t, 60)),
        _ => format!("{} (block {})", format_index(index), item.id),
    }
}

// ============================================================================
// Fetch
// ============================================================================

pub fn format_fetch_output(collections: &CollectionState) -> Vec<String> {
    let mut lines = Vec::new();
    for category in Category::ALL {
        let items = collections.get(category);
        lines.push(format!("{} ({})", category.label(), plural(items.len(), "item")));
        if items.is_empty() {
            lines.push(format!("{}empty or unavailable", indent(1)));
        }
        for (i, item) in items.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), item_line(i + 1, item)));
            lines.push(format!(
                "{}Created: {}",
                indent(2),
                item.created_at.format("%Y-%m-%d")
            ));
            if item.image_url().is_none() {
                lines.push(format!("{}No image: not rendered", indent(2)));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!("Fetched {}", plural(collections.total(), "item")));
    lines
}

pub fn print_fetch_output(collections: &CollectionState) {
    for line in format_fetch_output(collections) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    for view in &report.views {
        let detail = match view.selector {
            Selector::All => format!(
                "{}, {}, {} in gallery",
                plural(view.rows, "row"),
                plural(view.highlights, "highlight"),
                view.gallery
            ),
            Selector::Only(_) => format!(
                "{}, {} in grid, {} in gallery",
                plural(view.rows, "row"),
                view.grid,
                view.gallery
            ),
        };
        lines.push(format!("{} → {}", view.selector.label(), detail));
    }
    lines.push(format!("Assets: {}", plural(report.assets, "file")));
    lines.push(String::new());
    lines.push(format!("Generated index.html ({})", report.stats));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Watch
// ============================================================================

/// One line per poll round that changed something.
pub fn format_poll_event(collections: &CollectionState, report: &GenerateReport) -> String {
    let counts: Vec<String> = Category::ALL
        .iter()
        .map(|&c| format!("{} {}", collections.get(c).len(), c.as_str()))
        .collect();
    format!("Feed updated: {} → index.html ({})", counts.join(", "), report.stats)
}
