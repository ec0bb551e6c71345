//! Feed composition: turns the three channel lists into what the page shows.
//!
//! ## Combined view (`all`)
//!
//! ```text
//! merge all categories ─► sort by created_at desc ─► truncate to page count
//!        │                                                   │
//!        │                                    ┌──────────────┴─────────────┐
//!        ▼                                    ▼                            ▼
//!  first item per category            regular pool:                 gallery: every
//!  (native order) = highlight         captioned, not a highlight    truncated item
//!        │                                    │
//!        └──────────► interleave: film after pool[1],
//!                     publication after pool[5], archive after pool[7]
//! ```
//!
//! Slots are fixed. A missing highlight (empty category) is skipped and the
//! later slots keep their pool indices.
//!
//! ## Category view
//!
//! Rows are the native list reversed and restricted to captioned items,
//! without highlights. Uncaptioned items go to a grid in native order. The
//! gallery is the full reversed list so every image stays reachable.

use crate::types::{CategorizedItem, Category, CollectionState, Selector};
use serde::Serialize;
use std::collections::HashSet;

/// Pool index after which each category's highlight is emitted.
pub const HIGHLIGHT_SLOTS: [(usize, Category); 3] = [
    (1, Category::Film),
    (5, Category::Publication),
    (7, Category::Archive),
];

/// Everything the renderer needs for one view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComposedFeed {
    pub selector: Selector,
    /// Page rows in order; highlight duplicates carry `highlight = true`.
    pub rows: Vec<CategorizedItem>,
    /// Uncaptioned items (category views only).
    pub grid: Vec<CategorizedItem>,
    /// Full-screen navigation sequence.
    pub gallery: Vec<CategorizedItem>,
    /// Items available before truncation.
    pub total: usize,
    /// Items left after truncation (`total` outside the combined view).
    pub shown: usize,
}

impl ComposedFeed {
    /// Count for the "See N more" control; zero hides it.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.shown)
    }
}

/// All items across categories, newest first. Ties keep category order.
pub fn merged(state: &CollectionState) -> Vec<CategorizedItem> {
    let mut all: Vec<CategorizedItem> = Category::ALL
        .iter()
        .flat_map(|&c| {
            state
                .get(c)
                .iter()
                .map(move |item| CategorizedItem::new(c, item.clone()))
        })
        .collect();
    all.sort_by(|a, b| b.item.created_at.cmp(&a.item.created_at));
    all
}

/// First item of a category in its native (API) order.
pub fn highlight(state: &CollectionState, category: Category) -> Option<CategorizedItem> {
    state
        .get(category)
        .first()
        .map(|item| CategorizedItem::new(category, item.clone()))
}

/// Newest item within the selector, used for the hero background and footer banner.
pub fn most_recent(state: &CollectionState, selector: Selector) -> Option<CategorizedItem> {
    match selector {
        Selector::All => merged(state).into_iter().next(),
        Selector::Only(category) => {
            let mut best: Option<&crate::types::ContentItem> = None;
            for item in state.get(category) {
                if best.is_none_or(|b| item.created_at > b.created_at) {
                    best = Some(item);
                }
            }
            best.map(|item| CategorizedItem::new(category, item.clone()))
        }
    }
}

pub fn compose(state: &CollectionState, selector: Selector, show_more_count: usize) -> ComposedFeed {
    match selector {
        Selector::All => compose_all(state, show_more_count),
        Selector::Only(category) => compose_category(state, category),
    }
}

fn compose_all(state: &CollectionState, show_more_count: usize) -> ComposedFeed {
    let mut visible = merged(state);
    let total = visible.len();
    visible.truncate(show_more_count);

    let highlights: Vec<CategorizedItem> = HIGHLIGHT_SLOTS
        .iter()
        .filter_map(|&(_, c)| highlight(state, c))
        .collect();
    let highlight_ids: HashSet<u64> = highlights.iter().map(|h| h.item.id).collect();
    let highlight_for = |category: Category| highlights.iter().find(|h| h.category == category);

    let pool = visible
        .iter()
        .filter(|i| !highlight_ids.contains(&i.item.id) && i.item.has_caption());

    let mut rows = Vec::with_capacity(visible.len() + highlights.len());
    for (idx, item) in pool.enumerate() {
        rows.push(item.clone());
        for &(slot, category) in &HIGHLIGHT_SLOTS {
            if idx == slot {
                if let Some(h) = highlight_for(category) {
                    rows.push(h.as_highlight());
                }
            }
        }
    }

    ComposedFeed {
        selector: Selector::All,
        rows,
        grid: Vec::new(),
        shown: visible.len(),
        gallery: visible,
        total,
    }
}

fn compose_category(state: &CollectionState, category: Category) -> ComposedFeed {
    let native: Vec<CategorizedItem> = state
        .get(category)
        .iter()
        .map(|item| CategorizedItem::new(category, item.clone()))
        .collect();
    let reversed: Vec<CategorizedItem> = native.iter().rev().cloned().collect();

    ComposedFeed {
        selector: Selector::Only(category),
        rows: reversed
            .iter()
            .filter(|i| i.item.has_caption())
            .cloned()
            .collect(),
        grid: native
            .into_iter()
            .filter(|i| !i.item.has_caption())
            .collect(),
        total: reversed.len(),
        shown: reversed.len(),
        gallery: reversed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn combined_feed_sorted_newest_first() {
        let state = collections(
            vec![captioned(1, "2024-01-01", "Book")],
            vec![captioned(2, "2025-01-01", "Wall")],
            vec![captioned(3, "2024-06-01", "Trailer")],
        );
        let dates: Vec<String> = merged(&state)
            .iter()
            .map(|i| i.item.created_at.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, ["2025-01-01", "2024-06-01", "2024-01-01"]);
    }

    /// Nine captioned regular items newer than the three highlights.
    fn nine_plus_highlights() -> CollectionState {
        let mut publication = vec![captioned(100, "2020-01-01", "Book")];
        publication.extend(captioned_run(1, 9));
        collections(
            publication,
            vec![captioned(300, "2020-01-03", "Archive lead")],
            vec![captioned(200, "2020-01-02", "Film lead")],
        )
    }

    #[test]
    fn highlights_land_after_pool_indices_1_5_7() {
        let feed = compose(&nine_plus_highlights(), Selector::All, 20);
        assert_eq!(feed.rows.len(), 12);
        assert_eq!(highlight_positions(&feed.rows), vec![2, 7, 10]);
        assert_eq!(feed.rows[2].item.id, 200);
        assert_eq!(feed.rows[2].category, Category::Film);
        assert_eq!(feed.rows[7].item.id, 100);
        assert_eq!(feed.rows[7].category, Category::Publication);
        assert_eq!(feed.rows[10].item.id, 300);
        assert_eq!(feed.rows[10].category, Category::Archive);
    }

    #[test]
    fn highlight_ids_excluded_from_regular_pool() {
        let feed = compose(&nine_plus_highlights(), Selector::All, 20);
        let regular: Vec<u64> = feed
            .rows
            .iter()
            .filter(|r| !r.highlight)
            .map(|r| r.item.id)
            .collect();
        assert_eq!(regular, (1..=9).collect::<Vec<_>>());
        // Each highlight id appears exactly once, as the marked duplicate.
        for id in [100, 200, 300] {
            assert_eq!(feed.rows.iter().filter(|r| r.item.id == id).count(), 1);
        }
    }

    #[test]
    fn empty_film_skips_slot_without_renumbering() {
        let mut state = nine_plus_highlights();
        state.film.clear();
        let feed = compose(&state, Selector::All, 20);
        assert_eq!(feed.rows.len(), 11);
        // publication after regular index 5, archive after regular index 7
        assert_eq!(highlight_positions(&feed.rows), vec![6, 9]);
        assert_eq!(feed.rows[6].item.id, 100);
        assert_eq!(feed.rows[9].item.id, 300);
    }

    #[test]
    fn short_pool_only_fills_reached_slots() {
        let state = collections(
            vec![captioned(100, "2020-01-01", "Book")],
            vec![captioned(300, "2020-01-01", "Archive")],
            vec![captioned(200, "2020-01-01", "Film")],
        );
        let mut state = state;
        state.archive.extend(captioned_run(1, 3));
        let feed = compose(&state, Selector::All, 20);
        // pool = 1, 2, 3 (archive lead 300 is a highlight); only the film slot is reached
        assert_eq!(ids(&feed.rows), vec![1, 2, 200, 3]);
    }

    #[test]
    fn uncaptioned_items_stay_in_gallery_only() {
        let state = collections(
            vec![item(1, "2024-03-01"), captioned(2, "2024-02-01", "Book")],
            vec![],
            vec![],
        );
        let feed = compose(&state, Selector::All, 20);
        // id 1 is the publication highlight and uncaptioned; id 2 is regular
        assert_eq!(ids(&feed.rows), vec![2]);
        assert_eq!(ids(&feed.gallery), vec![1, 2]);
    }

    #[test]
    fn truncation_applies_before_filtering() {
        let state = collections(captioned_run(1, 45), vec![], vec![]);
        let feed = compose(&state, Selector::All, 20);
        assert_eq!(feed.total, 45);
        assert_eq!(feed.shown, 20);
        assert_eq!(feed.remaining(), 25);
        assert_eq!(feed.gallery.len(), 20);
        // id 1 is the publication highlight: 19 regular + 1 highlight
        assert_eq!(feed.rows.len(), 20);
    }

    #[test]
    fn larger_page_count_extends_rows_as_prefix() {
        let mut state = nine_plus_highlights();
        state.archive.extend(captioned_run(50, 30));
        let small = compose(&state, Selector::All, 20);
        let large = compose(&state, Selector::All, 40);
        assert!(large.rows.len() > small.rows.len());
        assert_eq!(&large.rows[..small.rows.len()], &small.rows[..]);
    }

    #[test]
    fn category_view_reverses_and_splits_captions() {
        let state = collections(
            vec![],
            vec![],
            vec![
                captioned(1, "2024-01-01", "First"),
                item(2, "2024-02-01"),
                captioned(3, "2024-03-01", "Third"),
                item(4, "2024-04-01"),
            ],
        );
        let feed = compose(&state, Selector::Only(Category::Film), 1);
        assert_eq!(ids(&feed.rows), vec![3, 1]);
        assert!(feed.rows.iter().all(|r| !r.highlight));
        assert_eq!(ids(&feed.grid), vec![2, 4]);
        assert_eq!(ids(&feed.gallery), vec![4, 3, 2, 1]);
        assert_eq!(feed.remaining(), 0);
    }

    #[test]
    fn empty_state_composes_to_nothing() {
        let feed = compose(&CollectionState::default(), Selector::All, 20);
        assert!(feed.rows.is_empty());
        assert!(feed.gallery.is_empty());
        assert_eq!(feed.remaining(), 0);
        assert!(most_recent(&CollectionState::default(), Selector::All).is_none());
    }

    #[test]
    fn most_recent_per_selector() {
        let state = collections(
            vec![item(1, "2024-01-01"), item(2, "2024-09-01")],
            vec![item(3, "2025-01-01")],
            vec![],
        );
        assert_eq!(most_recent(&state, Selector::All).unwrap().item.id, 3);
        assert_eq!(
            most_recent(&state, Selector::Only(Category::Publication))
                .unwrap()
                .item
                .id,
            2
        );
        assert!(most_recent(&state, Selector::Only(Category::Film)).is_none());
    }
}
