//! Shared test utilities: content-item builders and collection fixtures.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let state = collections(
//!     vec![captioned(1, "2024-01-01", "Book")],
//!     vec![],
//!     vec![captioned(2, "2025-01-01", "Trailer")],
//! );
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{CategorizedItem, CollectionState, ContentItem, ImageRef, Link};

/// Midnight UTC on a `YYYY-MM-DD` date. Panics on a malformed date.
pub fn date(ymd: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(ymd, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad fixture date '{ymd}': {e}"))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Bare item with an image and no caption.
pub fn item(id: u64, created: &str) -> ContentItem {
    ContentItem {
        id,
        title: None,
        description: None,
        image: Some(ImageRef {
            display: Some(Link {
                url: format!("https://images.test/{id}-display.jpg"),
            }),
            original: None,
        }),
        source: None,
        created_at: date(created),
        updated_at: date(created),
    }
}

/// Item with an image and a title.
pub fn captioned(id: u64, created: &str, title: &str) -> ContentItem {
    ContentItem {
        title: Some(title.to_string()),
        ..item(id, created)
    }
}

/// `n` captioned items with ids `start..start + n`, each one day older than
/// the previous, starting from 2025-01-31.
pub fn captioned_run(start: u64, n: usize) -> Vec<ContentItem> {
    (0..n)
        .map(|i| {
            let day = date("2025-01-31") - chrono::Duration::days(i as i64);
            ContentItem {
                created_at: day,
                updated_at: day,
                ..captioned(start + i as u64, "2025-01-31", &format!("Item {}", start + i as u64))
            }
        })
        .collect()
}

pub fn collections(
    publication: Vec<ContentItem>,
    archive: Vec<ContentItem>,
    film: Vec<ContentItem>,
) -> CollectionState {
    CollectionState {
        publication,
        archive,
        film,
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Ids in feed order.
pub fn ids(items: &[CategorizedItem]) -> Vec<u64> {
    items.iter().map(|i| i.item.id).collect()
}

/// Positions of highlight duplicates in feed order.
pub fn highlight_positions(items: &[CategorizedItem]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, i)| i.highlight)
        .map(|(pos, _)| pos)
        .collect()
}
