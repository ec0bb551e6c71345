//! HTML site generation.
//!
//! Renders the whole site into a single self-contained `index.html`: every
//! view (all, publication, film, archive) is pre-rendered as its own
//! section and the page script toggles between them, so there is no routing
//! and no state in the URL.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html            # The page (inline CSS, JSON data, inline JS)
//! ├── footer-inverted.jpg   # Copied from <source>/assets/
//! ├── contact-1.png
//! └── .write-cache.json     # Hashes of written files (see cache.rs)
//! ```
//!
//! ## Embedded data
//!
//! - `#axis-bands`: the scroll animation band table from [`crate::animate`].
//! - `.gallery-data` (one per view): the full-screen viewer sequence.
//!
//! Combined-view rows carry a `data-step` pagination step computed by
//! re-composing the feed at each page count. Composition is prefix-stable,
//! so revealing steps in order shows exactly what a fresh compose at that
//! count would produce.
//!
//! Items without an image URL are never rendered, neither as rows nor in
//! a gallery.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use crate::animate::{AxisMap, FontAxes, ScrollAnimator, band_table_json};
use crate::cache::{WriteCache, WriteStats};
use crate::compose::{ComposedFeed, compose, most_recent};
use crate::config::{self, SiteConfig};
use crate::types::{CategorizedItem, Category, CollectionState, Selector};
use crate::view::ViewState;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/feed.js");

/// Per-view row counts, for CLI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSummary {
    pub selector: Selector,
    pub rows: usize,
    pub highlights: usize,
    pub grid: usize,
    pub gallery: usize,
}

/// What a generate run produced.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub views: Vec<ViewSummary>,
    pub assets: usize,
    pub stats: WriteStats,
}

/// Everything the page template needs, resolved up front.
pub struct PageInput<'a> {
    pub collections: &'a CollectionState,
    pub config: &'a SiteConfig,
    /// Already-rendered info modal body.
    pub info_html: String,
    pub loading: bool,
}

/// Render the page and copy assets into `output_dir`.
pub fn generate(
    collections: &CollectionState,
    loading: bool,
    config: &SiteConfig,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let mut cache = WriteCache::load(output_dir);
    let mut stats = WriteStats::default();

    let input = PageInput {
        collections,
        config,
        info_html: load_info_html(source_dir, config)?,
        loading,
    };
    let views = summarize_views(collections, config.feed.page_size);
    let page = render_page(&input);
    stats.record(&cache.write(output_dir, "index.html", page.into_string().as_bytes())?);

    let assets = copy_assets(&source_dir.join(&config.assets_dir), output_dir, &mut cache, &mut stats)?;
    cache.save(output_dir)?;

    Ok(GenerateReport {
        views,
        assets,
        stats,
    })
}

/// `info.md` next to the config wins over the configured text.
fn load_info_html(source_dir: &Path, config: &SiteConfig) -> Result<String, GenerateError> {
    let info_path = source_dir.join("info.md");
    let markdown = if info_path.exists() {
        fs::read_to_string(&info_path)?
    } else {
        config.site.info.clone()
    };
    Ok(markdown_to_html(&markdown))
}

fn copy_assets(
    assets_dir: &Path,
    output_dir: &Path,
    cache: &mut WriteCache,
    stats: &mut WriteStats,
) -> Result<usize, GenerateError> {
    if !assets_dir.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(assets_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(assets_dir) else {
            continue;
        };
        let rel = rel.to_string_lossy().replace('\\', "/");
        let bytes = fs::read(entry.path())?;
        stats.record(&cache.write(output_dir, &rel, &bytes)?);
        copied += 1;
    }
    Ok(copied)
}

fn summarize_views(collections: &CollectionState, page_size: usize) -> Vec<ViewSummary> {
    Selector::NAV_ORDER
        .iter()
        .map(|&selector| {
            let feed = compose(collections, selector, page_size);
            ViewSummary {
                selector,
                rows: feed.rows.iter().filter(|r| !r.highlight).count(),
                highlights: feed.rows.iter().filter(|r| r.highlight).count(),
                grid: feed.grid.len(),
                gallery: feed.gallery.len(),
            }
        })
        .collect()
}

// ============================================================================
// Markdown and data helpers
// ============================================================================

pub fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(markdown));
    out
}

/// Markdown for a single line of copy: the wrapping paragraph is dropped.
pub fn inline_markdown(markdown: &str) -> String {
    let html = markdown_to_html(markdown);
    let trimmed = html.trim_end();
    trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .unwrap_or(trimmed)
        .to_string()
}

/// URL safe to place inside a CSS `url('...')` in a style attribute.
fn css_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\'' => out.push_str("%27"),
            '"' => out.push_str("%22"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '\\' => out.push_str("%5C"),
            c if c.is_whitespace() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

/// JSON safe to place inside a `<script>` element.
fn script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

/// One full-screen viewer entry.
#[derive(Debug, Serialize)]
struct GalleryEntry<'a> {
    url: &'a str,
    title: Option<&'a str>,
    category: Category,
    /// Pagination step that reveals this entry (combined view).
    step: usize,
}

/// Pagination step per row of the fully expanded combined feed.
fn row_steps(collections: &CollectionState, page_size: usize) -> Vec<usize> {
    let total = collections.total();
    let pages = total.div_ceil(page_size).max(1);
    let mut steps = Vec::new();
    for page in 0..pages {
        let len = compose(collections, Selector::All, (page + 1) * page_size)
            .rows
            .len();
        steps.resize(len.max(steps.len()), page);
    }
    steps
}

/// Viewable gallery entries (items with an image) in gallery order.
fn viewable(feed: &ComposedFeed, page_size: usize) -> Vec<(&CategorizedItem, usize)> {
    feed.gallery
        .iter()
        .enumerate()
        .filter(|(_, item)| item.item.image_url().is_some())
        .map(|(pos, item)| {
            let step = match feed.selector {
                Selector::All => pos / page_size,
                Selector::Only(_) => 0,
            };
            (item, step)
        })
        .collect()
}

fn gallery_position(entries: &[(&CategorizedItem, usize)], row: &CategorizedItem) -> Option<usize> {
    entries
        .iter()
        .position(|(i, _)| i.category == row.category && i.item.id == row.item.id)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Hero copy for a view, as inline markdown.
pub fn hero_text(config: &SiteConfig, selector: Selector) -> &str {
    match selector {
        Selector::All => &config.site.hero_all,
        Selector::Only(Category::Publication) => &config.site.hero_publication,
        Selector::Only(Category::Film) => &config.site.hero_film,
        Selector::Only(Category::Archive) => &config.site.hero_archive,
    }
}

/// Hero banner: per-view copy, plus the newest image as background in category views.
fn render_hero(input: &PageInput, active: Selector) -> Markup {
    let backgrounds: Vec<(Selector, String)> = Category::ALL
        .iter()
        .filter_map(|&c| {
            let selector = Selector::Only(c);
            let newest = most_recent(input.collections, selector)?;
            Some((selector, css_url(newest.item.image_url()?)))
        })
        .collect();
    html! {
        div.hero-section {
            @for (selector, url) in &backgrounds {
                div.hero-bg data-view=(selector.as_str()) hidden[*selector != active]
                    style={ "background-image: url('" (url) "')" } {}
            }
            @for selector in Selector::NAV_ORDER {
                p.hero-text data-view=(selector.as_str()) hidden[selector != active] {
                    (PreEscaped(inline_markdown(hero_text(input.config, selector))))
                }
            }
        }
    }
}

/// Sticky category navigation.
pub fn render_nav(active: Selector) -> Markup {
    html! {
        nav.sticky-nav {
            @for selector in Selector::NAV_ORDER {
                button.navigation-text.active[selector == active] type="button"
                    data-select=(selector.as_str()) {
                    (selector.label())
                }
            }
            div.nav-spacer {}
        }
    }
}

/// Info and contact toggles. The contact button reads "Exit" while its modal is open.
fn render_corner_buttons(state: &ViewState) -> Markup {
    html! {
        div.corner-buttons {
            button.info-button type="button" aria-controls="info-modal" { "Info" }
            button.contact-button type="button" aria-controls="contact-modal" {
                @if state.contact_open { "Exit" } @else { "Contact" }
            }
        }
    }
}

fn render_contact_modal(input: &PageInput, state: &ViewState) -> Markup {
    let contact = &input.config.contact;
    html! {
        div.contact-modal.modal id="contact-modal" hidden[!state.contact_open] {
            div.contact-table {
                h2.contact-table-heading { (contact.heading) }
                @for entry in &contact.entries {
                    a.contact-row href=(entry.url) target="_blank" rel="noopener noreferrer" {
                        span.contact-role { (entry.role) }
                        span.contact-name { (entry.name) }
                    }
                }
            }
            div.contact-email-links {
                @for prompt in &contact.prompts {
                    a.contact-email-link href={ "mailto:" (contact.email) } {
                        p { (prompt.heading) }
                        img src=(prompt.image) alt=(prompt.heading) loading="lazy";
                    }
                }
            }
        }
    }
}

fn render_info_modal(input: &PageInput, state: &ViewState) -> Markup {
    html! {
        div.info-modal.modal id="info-modal" hidden[!state.info_open] {
            article.info-content {
                (PreEscaped(&input.info_html))
            }
        }
    }
}

/// Highlight block: clicking switches to its category.
fn render_display_block(row: &CategorizedItem, url: &str, step: usize) -> Markup {
    html! {
        div.display-block data-highlight=(row.category.as_str()) data-step=(step)
            data-key=(row.key().to_string()) {
            img src=(url) alt=(row.item.title.as_deref().unwrap_or("Display")) loading="lazy";
            div.display-overlay {
                h2.display-text { (row.item.title.as_deref().unwrap_or("Untitled")) }
                @if let Some(desc) = &row.item.description {
                    p.navigation-text.display-category { (desc) }
                }
                p.navigation-text.display-category { (row.category.as_str()) }
            }
        }
    }
}

/// Regular feed row. Archive titles and publication/film descriptions get
/// the variable-font axes.
fn render_item_row(
    row: &CategorizedItem,
    url: &str,
    gallery_index: Option<usize>,
    step: usize,
    axes: &AxisMap,
) -> Markup {
    let style = axes
        .get(&row.key())
        .copied()
        .unwrap_or(FontAxes::RESOLVED)
        .to_css();
    let style = format!("font-variation-settings: {style}");
    let is_archive = row.category == Category::Archive;
    let title = row.item.title.as_deref().unwrap_or("Untitled");

    html! {
        div.item-row data-key=(row.key().to_string()) data-step=(step)
            data-category=(row.category.as_str()) {
            img.item-image src=(url) alt=(row.item.title.as_deref().unwrap_or("Block"))
                loading="lazy" data-gallery=[gallery_index];
            div.item-content {
                @if is_archive {
                    h1.item-title.sofia-nav-scroll.archive data-axes style=(style) { (title) }
                } @else {
                    h1.item-title { (title) }
                }
                @let description = row.item.description.as_deref().unwrap_or("");
                @if is_archive {
                    p.item-description { (description) }
                } @else {
                    p.item-description.sofia-nav-scroll data-axes style=(style) { (description) }
                }
                @if let Some(source) = row.item.source_url() {
                    a.show-more-button href=(source) target="_blank" rel="noopener noreferrer" {
                        "Link"
                    }
                }
                @if is_archive {
                    p.item-category.sofia-nav-scroll.archive data-axes style=(style) {
                        (row.category.as_str())
                    }
                } @else {
                    p class={ "item-category sofia-nav-scroll " (row.category.as_str()) } {
                        (row.category.as_str())
                    }
                }
            }
        }
    }
}

/// One pre-rendered view: rows, optional grid, pagination control, gallery data.
fn render_feed_section(input: &PageInput, state: &ViewState, selector: Selector) -> Markup {
    let page_size = state.page_size;
    let feed = match selector {
        // Fully expanded; `data-step` limits what is visible.
        Selector::All => compose(input.collections, selector, input.collections.total()),
        Selector::Only(_) => compose(input.collections, selector, page_size),
    };
    let steps = match selector {
        Selector::All => row_steps(input.collections, page_size),
        Selector::Only(_) => vec![0; feed.rows.len()],
    };
    let entries = viewable(&feed, page_size);
    let gallery: Vec<GalleryEntry> = entries
        .iter()
        .map(|(item, step)| GalleryEntry {
            url: item.item.image_url().unwrap_or_default(),
            title: item.item.title.as_deref(),
            category: item.category,
            step: *step,
        })
        .collect();
    let gallery_json = script_json(&serde_json::to_string(&gallery).unwrap_or_else(|_| "[]".into()));

    let animator = ScrollAnimator::new(feed.rows.iter().filter(|r| !r.highlight).map(|r| r.key()));
    // Nothing is measured at build time: every row starts resolved.
    let axes = animator.frame(0.0, |_| None);
    let total = feed.total;
    let see_more = if selector == Selector::All {
        state.see_more(total)
    } else {
        None
    };
    let active = selector == state.selector;

    html! {
        section.feed data-view=(selector.as_str()) data-total=(total) hidden[!active] {
            @for (idx, row) in feed.rows.iter().enumerate() {
                @if let Some(url) = row.item.image_url() {
                    @let step = steps.get(idx).copied().unwrap_or(0);
                    @if row.highlight {
                        (render_display_block(row, url, step))
                    } @else {
                        (render_item_row(row, url, gallery_position(&entries, row), step, &axes))
                    }
                }
            }
            @if !feed.grid.is_empty() {
                div.grid-3col {
                    @for (idx, item) in feed.grid.iter().enumerate() {
                        @if let Some(url) = item.item.image_url() {
                            img src=(url) alt={ "Grid item " (idx) } loading="lazy"
                                data-gallery=[gallery_position(&entries, item)];
                        }
                    }
                }
            }
            @if selector == Selector::All {
                div.show-more-section hidden[see_more.is_none()] {
                    button.show-more-button type="button" data-see-more {
                        "See " span.see-more-count { (see_more.unwrap_or(0)) } " more"
                    }
                }
            }
            script.gallery-data type="application/json" { (PreEscaped(gallery_json)) }
        }
    }
}

/// Viewer entries reachable from the active view under the current pagination.
fn active_gallery_len(input: &PageInput, state: &ViewState) -> usize {
    compose(input.collections, state.selector, state.show_more_count)
        .gallery
        .iter()
        .filter(|i| i.item.image_url().is_some())
        .count()
}

fn render_viewer(state: &ViewState, gallery_len: usize) -> Markup {
    html! {
        div.viewer.modal id="viewer" hidden[state.expanded.is_none()] {
            button.viewer-close type="button" { "Exit" }
            button.viewer-prev type="button" disabled[!state.can_go_previous()] { "Previous" }
            figure.viewer-frame {
                img.viewer-image alt="";
                figcaption.viewer-caption {}
            }
            button.viewer-next type="button" disabled[!state.can_go_next(gallery_len)] { "Next" }
        }
    }
}

/// Footer text, plus one banner per view whose newest item has an image.
fn render_footer(input: &PageInput, active: Selector) -> Markup {
    let banners: Vec<Selector> = Selector::NAV_ORDER
        .into_iter()
        .filter(|&selector| {
            most_recent(input.collections, selector).is_some_and(|i| i.item.image_url().is_some())
        })
        .collect();
    html! {
        div.footer-hero {
            p.hero-text { (input.config.site.footer) }
        }
        @for selector in banners {
            div.footer-display data-view=(selector.as_str()) hidden[selector != active] {
                div.display-overlay-inverted {
                    img src=(input.config.site.footer_image) alt="Footer display" loading="lazy";
                }
            }
        }
    }
}

// ============================================================================
// Page Renderer
// ============================================================================

/// Renders the complete page in its initial view state.
pub fn render_page(input: &PageInput) -> Markup {
    let mut state = ViewState::initial(input.config.feed.page_size);
    state.loading = input.loading;

    let css = format!(
        "{}\n\n{}",
        config::generate_theme_css(&input.config.colors, &input.config.theme),
        CSS_STATIC
    );

    let content = html! {
        (render_hero(input, state.selector))
        (render_nav(state.selector))
        (render_corner_buttons(&state))
        (render_contact_modal(input, &state))
        (render_info_modal(input, &state))
        main data-page-size=(state.page_size) {
            @for selector in Selector::NAV_ORDER {
                (render_feed_section(input, &state, selector))
            }
        }
        (render_footer(input, state.selector))
        @if state.loading {
            div.loading { "Loading..." }
        }
        (render_viewer(&state, active_gallery_len(input, &state)))
        script id="axis-bands" type="application/json" { (PreEscaped(script_json(&band_table_json()))) }
        script { (PreEscaped(JS)) }
    };

    base_document(&input.config.site.title, &css, Some("serif"), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn page(collections: &CollectionState) -> String {
        let config = SiteConfig::default();
        let input = PageInput {
            collections,
            config: &config,
            info_html: markdown_to_html(&config.site.info),
            loading: false,
        };
        render_page(&input).into_string()
    }

    fn sample() -> CollectionState {
        let mut archive = vec![captioned(300, "2020-01-03", "Archive lead")];
        archive.extend(captioned_run(1, 9));
        collections(
            vec![captioned(100, "2020-01-01", "Book")],
            archive,
            vec![captioned(200, "2020-01-02", "Trailer")],
        )
    }

    #[test]
    fn page_includes_doctype_and_title() {
        let html = page(&sample());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>9413 Sophia Avenue</title>"));
    }

    #[test]
    fn hero_emphasis_renders_inline() {
        let html = page(&sample());
        assert!(html.contains("is a <em>choreographed deconstruction</em> of"));
    }

    #[test]
    fn hero_text_per_view() {
        let config = SiteConfig::default();
        assert_eq!(
            hero_text(&config, Selector::Only(Category::Film)),
            "The film trailer is ready"
        );
        assert_eq!(inline_markdown("a *b*"), "a <em>b</em>");
    }

    #[test]
    fn nav_marks_all_active() {
        let html = render_nav(Selector::All).into_string();
        assert!(html.contains(r#"class="navigation-text active" type="button" data-select="all""#));
        assert!(html.contains(r#"data-select="film""#));
    }

    #[test]
    fn every_view_is_prerendered_and_only_all_is_visible() {
        let html = page(&sample());
        assert!(html.contains(r#"<section class="feed" data-view="all" data-total="12">"#));
        assert!(html.contains(r#"data-view="publication" data-total="1" hidden"#));
        assert!(html.contains(r#"data-view="archive" data-total="10" hidden"#));
    }

    #[test]
    fn highlights_render_as_display_blocks() {
        let html = page(&sample());
        assert!(html.contains(r#"data-highlight="film""#));
        assert!(html.contains(r#"data-highlight="publication""#));
        assert!(html.contains(r#"data-highlight="archive""#));
    }

    #[test]
    fn rows_start_with_resolved_axes() {
        let html = page(&sample());
        assert!(html.contains("font-variation-settings: &quot;grow&quot; 1000, &quot;THCK&quot; 1000"));
    }

    #[test]
    fn items_without_images_are_skipped() {
        let mut no_image = captioned(77, "2025-06-01", "Missing picture");
        no_image.image = None;
        let state = collections(vec![captioned(1, "2024-01-01", "Book")], vec![no_image], vec![]);
        let html = page(&state);
        assert!(!html.contains("Missing picture"));
    }

    #[test]
    fn see_more_reflects_remaining_items() {
        let state = collections(captioned_run(1, 45), vec![], vec![]);
        let html = page(&state);
        assert!(html.contains(r#"<span class="see-more-count">25</span>"#));
    }

    #[test]
    fn see_more_hidden_when_everything_fits() {
        let html = page(&sample());
        assert!(html.contains(r#"<div class="show-more-section" hidden>"#));
    }

    #[test]
    fn row_steps_follow_page_size() {
        let state = collections(captioned_run(1, 45), vec![], vec![]);
        let steps = row_steps(&state, 20);
        // 44 regular rows + the publication highlight
        assert_eq!(steps.len(), 45);
        assert_eq!(steps[0], 0);
        assert_eq!(steps[19], 0);
        assert_eq!(steps[20], 1);
        assert_eq!(steps[44], 2);
    }

    #[test]
    fn footer_banner_needs_an_image() {
        let html = page(&CollectionState::default());
        assert!(!html.contains(r#"<div class="footer-display""#));
        let html = page(&sample());
        assert!(html.contains(r#"<div class="footer-display" data-view="all">"#));
    }

    #[test]
    fn footer_banner_follows_each_view() {
        let mut state = sample();
        state.film.clear();
        let html = page(&state);
        assert!(html.contains(r#"<div class="footer-display" data-view="publication" hidden>"#));
        assert!(html.contains(r#"<div class="footer-display" data-view="archive" hidden>"#));
        assert!(!html.contains(r#"<div class="footer-display" data-view="film""#));
    }

    #[test]
    fn css_url_cannot_close_the_declaration() {
        assert_eq!(
            css_url("https://x.test/a') ; background:url('evil"),
            "https://x.test/a%27%29%20;%20background:url%28%27evil"
        );
        assert_eq!(css_url("https://images.test/1.jpg"), "https://images.test/1.jpg");
    }

    #[test]
    fn hero_background_url_is_encoded() {
        let mut film = captioned(5, "2024-01-01", "Trailer");
        film.image.as_mut().unwrap().display = Some(crate::types::Link {
            url: "https://x.test/a').jpg".into(),
        });
        let html = page(&collections(vec![], vec![], vec![film]));
        assert!(html.contains("url('https://x.test/a%27%29.jpg')"));
        assert!(!html.contains("url('https://x.test/a')"));
    }

    #[test]
    fn viewer_controls_follow_gallery_bounds() {
        let mut state = ViewState::initial(20);
        let closed = render_viewer(&state, 3).into_string();
        assert!(closed.contains(r#"<button class="viewer-prev" type="button" disabled>"#));
        assert!(closed.contains(r#"<button class="viewer-next" type="button" disabled>"#));

        state.expanded = Some(0);
        let first = render_viewer(&state, 3).into_string();
        assert!(first.contains(r#"<button class="viewer-prev" type="button" disabled>"#));
        assert!(first.contains(r#"<button class="viewer-next" type="button">"#));

        state.expanded = Some(2);
        let last = render_viewer(&state, 3).into_string();
        assert!(last.contains(r#"<button class="viewer-prev" type="button">"#));
        assert!(last.contains(r#"<button class="viewer-next" type="button" disabled>"#));
    }

    #[test]
    fn contact_button_reads_exit_while_open() {
        let mut state = ViewState::initial(20);
        assert!(render_corner_buttons(&state).into_string().contains(">Contact</button>"));
        state.contact_open = true;
        assert!(render_corner_buttons(&state).into_string().contains(">Exit</button>"));
    }

    #[test]
    fn category_hero_uses_newest_image() {
        let html = page(&sample());
        assert!(html.contains(r#"data-view="film" hidden style="background-image: url('https://images.test/200-display.jpg')""#));
    }

    #[test]
    fn contact_directory_lists_entries() {
        let html = page(&sample());
        assert!(html.contains("Contact the Project Team"));
        assert!(html.contains("C&amp;J Contractors"));
        assert!(html.contains("mailto:contact@9413sophia.com"));
    }

    #[test]
    fn band_table_is_embedded() {
        let html = page(&sample());
        assert!(html.contains(r#"<script id="axis-bands" type="application/json">[{"start":0.0"#));
    }

    #[test]
    fn script_json_escapes_closing_tags() {
        assert_eq!(
            script_json(r#"{"t":"</script>"}"#),
            r#"{"t":"\u003c/script>"}"#
        );
    }

    #[test]
    fn html_escape_in_maud() {
        let state = collections(
            vec![captioned(1, "2024-01-01", "<script>alert('xss')</script>")],
            vec![],
            vec![],
        );
        let html = page(&state);
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn generate_writes_page_and_assets() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("assets/fonts")).unwrap();
        fs::write(source.path().join("assets/footer-inverted.jpg"), b"jpg").unwrap();
        fs::write(source.path().join("assets/fonts/FungalVF.woff2"), b"font").unwrap();
        fs::write(source.path().join("info.md"), "About **the house**.").unwrap();

        let config = SiteConfig::default();
        let report = generate(&sample(), false, &config, source.path(), out.path()).unwrap();
        assert_eq!(report.assets, 2);
        assert_eq!(report.stats.written, 3);
        assert!(out.path().join("fonts/FungalVF.woff2").exists());
        let html = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(html.contains("<strong>the house</strong>"));

        // Second run: nothing changed on disk.
        let report = generate(&sample(), false, &config, source.path(), out.path()).unwrap();
        assert_eq!(report.stats.written, 0);
        assert_eq!(report.stats.unchanged, 3);
    }

    #[test]
    fn summaries_count_rows_and_highlights() {
        let views = summarize_views(&sample(), 20);
        let all = &views[0];
        assert_eq!(all.selector, Selector::All);
        assert_eq!(all.rows, 9);
        assert_eq!(all.highlights, 3);
    }
}
