//! Shared types used across the fetch, compose and generate stages.
//!
//! [`CollectionState`] is serialized into the feed snapshot (`feed.json`)
//! between `fetch` and `generate`, so field names here follow the Are.na
//! block JSON and must stay stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three fixed content groupings.
///
/// `ALL` is the fetch order. Navigation uses [`Selector::NAV_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Publication,
    Archive,
    Film,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Publication, Category::Archive, Category::Film];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Publication => "publication",
            Category::Archive => "archive",
            Category::Film => "film",
        }
    }

    /// Capitalized label used in navigation.
    pub fn label(self) -> &'static str {
        match self {
            Category::Publication => "Publication",
            Category::Archive => "Archive",
            Category::Film => "Film",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which view is active: the combined feed or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    #[default]
    All,
    #[serde(untagged)]
    Only(Category),
}

impl Selector {
    pub const NAV_ORDER: [Selector; 4] = [
        Selector::All,
        Selector::Only(Category::Publication),
        Selector::Only(Category::Film),
        Selector::Only(Category::Archive),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Selector::All => "all",
            Selector::Only(c) => c.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Selector::All => "All",
            Selector::Only(c) => c.label(),
        }
    }
}

/// A URL wrapper matching Are.na's `{ "url": ... }` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Image variants of a block. Either may be missing on odd block classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub display: Option<Link>,
    #[serde(default)]
    pub original: Option<Link>,
}

/// A block as returned by the content API. Never mutated after fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default)]
    pub source: Option<Link>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// True when the item has a non-empty title or description.
    pub fn has_caption(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.title) || filled(&self.description)
    }

    /// Display variant first, then original. `None` means the item is not rendered.
    pub fn image_url(&self) -> Option<&str> {
        let image = self.image.as_ref()?;
        image
            .display
            .as_ref()
            .or(image.original.as_ref())
            .map(|l| l.url.as_str())
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.url.as_str())
    }
}

/// A content item tagged with its owning category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedItem {
    pub category: Category,
    /// Set only on the duplicate injected into the combined feed.
    pub highlight: bool,
    #[serde(flatten)]
    pub item: ContentItem,
}

impl CategorizedItem {
    pub fn new(category: Category, item: ContentItem) -> Self {
        Self {
            category,
            highlight: false,
            item,
        }
    }

    pub fn as_highlight(&self) -> Self {
        Self {
            highlight: true,
            ..self.clone()
        }
    }

    /// Stable key for per-item animation state.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            category: self.category,
            id: self.item.id,
            highlight: self.highlight,
        }
    }
}

/// Identity of a rendered row. The highlight duplicate gets its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub category: Category,
    pub id: u64,
    pub highlight: bool,
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.highlight {
            write!(f, "display-{}-{}", self.category, self.id)
        } else {
            write!(f, "{}-{}", self.category, self.id)
        }
    }
}

/// Items per category, always exactly the three known categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionState {
    #[serde(default)]
    pub publication: Vec<ContentItem>,
    #[serde(default)]
    pub archive: Vec<ContentItem>,
    #[serde(default)]
    pub film: Vec<ContentItem>,
}

impl CollectionState {
    pub fn get(&self, category: Category) -> &[ContentItem] {
        match category {
            Category::Publication => &self.publication,
            Category::Archive => &self.archive,
            Category::Film => &self.film,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<ContentItem> {
        match category {
            Category::Publication => &mut self.publication,
            Category::Archive => &mut self.archive,
            Category::Film => &mut self.film,
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }
}

/// Serialized output of the fetch stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub collections: CollectionState,
}
