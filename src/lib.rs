//! # Sophia Site
//!
//! Builds the promotional and archival site for the 9413 Sophia Avenue
//! project. Content lives in three Are.na channels (publication, archive,
//! film); this crate fetches them, composes a chronological feed with
//! highlight blocks, and renders a single self-contained page.
//!
//! # Architecture: Fetch, Compose, Render
//!
//! ```text
//! 1. Fetch     Are.na channels  →  .sophia-temp/feed.json   (three concurrent requests)
//! 2. Generate  feed.json        →  dist/index.html          (compose every view, render)
//!
//!    Watch     poll every interval, regenerate when a channel's lead changes
//! ```
//!
//! The snapshot between the stages is plain JSON, so a generate run can be
//! repeated (or debugged) without touching the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | `ChannelSource` trait and the reqwest Are.na client; failure-isolated rounds |
//! | [`poller`] | Background refresh task with cheap change detection, published on a `watch` channel |
//! | [`compose`] | Merge, sort, truncate, inject highlights; category views and galleries |
//! | [`animate`] | Scroll progress → variable-font axes band table, frame throttling |
//! | [`view`] | Page view state and its transition function |
//! | [`generate`] | Maud page rendering, asset copying |
//! | [`cache`] | Skips rewriting output files whose contents did not change |
//! | [`config`] | `config.toml` loading, validation, stock defaults, theme CSS |
//! | [`types`] | Content items, categories, selectors, the feed snapshot |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Page, Every View
//!
//! All four views are rendered into the same document and the page script
//! only toggles visibility. Composition rules therefore live in Rust and are
//! unit tested; the browser never re-derives the feed.
//!
//! ## Degrade, Don't Fail
//!
//! A channel that errors contributes an empty list and a log line. The page
//! is still generated from whatever the other channels returned.

pub mod animate;
pub mod cache;
pub mod compose;
pub mod config;
pub mod generate;
pub mod output;
pub mod poller;
pub mod source;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
