//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! describe the live 9413 Sophia Avenue site; a `config.toml` in the source
//! directory overrides any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml          # Overrides stock defaults (optional)
//! ├── info.md              # Info modal body (optional, markdown)
//! └── assets/              # Copied verbatim to the output root
//!     ├── footer-inverted.jpg
//!     └── contact-1.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! assets_dir = "assets"
//!
//! [api]
//! base_url = "https://api.are.na/v2"
//! per_page = 100            # Items requested per channel (max 100)
//! timeout_secs = 30
//! user_agent = "sophia-site"
//!
//! [channels]
//! publication = "9413-sophia-ave-publication"
//! archive = "9413-sophia-ave-archive"
//! film = "9413-sophia-ave-film"
//!
//! [poll]
//! interval_secs = 120       # Refresh cadence for `watch`
//!
//! [feed]
//! page_size = 20            # Initial rows and "see more" step
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early. Arrays (contact entries, prompts)
//! replace the stock list wholesale.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory (relative to the source dir) copied to the output root.
    pub assets_dir: String,
    /// Content API access.
    pub api: ApiConfig,
    /// Channel slug per category.
    pub channels: ChannelsConfig,
    /// Refresh cadence for `watch`.
    pub poll: PollConfig,
    /// Combined-feed pagination.
    pub feed: FeedConfig,
    /// Hero, footer and info copy.
    pub site: SiteText,
    /// Contact directory modal.
    pub contact: ContactConfig,
    pub colors: ColorConfig,
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            api: ApiConfig::default(),
            channels: ChannelsConfig::default(),
            poll: PollConfig::default(),
            feed: FeedConfig::default(),
            site: SiteText::default(),
            contact: ContactConfig::default(),
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.per_page == 0 || self.api.per_page > 100 {
            return Err(ConfigError::Validation(
                "api.per_page must be 1-100".into(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be non-zero".into(),
            ));
        }
        match reqwest::Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "api.base_url must be an http(s) URL, got '{}'",
                    self.api.base_url
                )));
            }
        }
        for category in Category::ALL {
            if self.channels.slug(category).trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "channels.{category} must not be empty"
                )));
            }
        }
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll.interval_secs must be non-zero".into(),
            ));
        }
        if self.feed.page_size == 0 {
            return Err(ConfigError::Validation(
                "feed.page_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Content API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Items requested in the single page fetched per channel.
    pub per_page: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.are.na/v2".to_string(),
            per_page: 100,
            timeout_secs: 30,
            user_agent: format!("sophia-site/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Channel slug per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelsConfig {
    pub publication: String,
    pub archive: String,
    pub film: String,
}

impl ChannelsConfig {
    pub fn slug(&self, category: Category) -> &str {
        match category {
            Category::Publication => &self.publication,
            Category::Archive => &self.archive,
            Category::Film => &self.film,
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            publication: "9413-sophia-ave-publication".to_string(),
            archive: "9413-sophia-ave-archive".to_string(),
            film: "9413-sophia-ave-film".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollConfig {
    pub interval_secs: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 120 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Rows shown initially in the combined view, and the "see more" step.
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// Page copy. Hero texts accept inline markdown (`*emphasis*` animates).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteText {
    pub title: String,
    pub hero_all: String,
    pub hero_publication: String,
    pub hero_film: String,
    pub hero_archive: String,
    pub footer: String,
    /// Footer banner image, relative to the assets directory.
    pub footer_image: String,
    /// Info modal body, used when the source dir has no `info.md`.
    pub info: String,
}

impl Default for SiteText {
    fn default() -> Self {
        Self {
            title: "9413 Sophia Avenue".to_string(),
            hero_all: "The 9413 Sophia Avenue Project is a *choreographed deconstruction* of the built environment".to_string(),
            hero_publication: "The publication shows the dedication to the project and its content".to_string(),
            hero_film: "The film trailer is ready".to_string(),
            hero_archive: "The archive of the choreographed deconstruction is living".to_string(),
            footer: "Thank you for caring for this house with us.".to_string(),
            footer_image: "footer-inverted.jpg".to_string(),
            info: "The 9413 Sophia Avenue Project is a choreographed deconstruction of the built environment.".to_string(),
        }
    }
}

/// A role/name row in the contact directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactEntry {
    pub role: String,
    pub name: String,
    pub url: String,
}

/// A mail prompt tile ("Showing the film?") with its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactPrompt {
    pub heading: String,
    /// Image path relative to the assets directory.
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub heading: String,
    pub email: String,
    pub entries: Vec<ContactEntry>,
    pub prompts: Vec<ContactPrompt>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        let entry = |role: &str, name: &str, url: &str| ContactEntry {
            role: role.to_string(),
            name: name.to_string(),
            url: url.to_string(),
        };
        let prompt = |heading: &str, image: &str| ContactPrompt {
            heading: heading.to_string(),
            image: image.to_string(),
        };
        Self {
            heading: "Contact the Project Team".to_string(),
            email: "contact@9413sophia.com".to_string(),
            entries: vec![
                entry("Project Lead", "Malena Grigoli", "https://malenagrigoli.com/9413sophia.html"),
                entry("Photographer", "Colin Martinez", "https://colinmartinez.xyz/9413-sophia-avenue-gallery"),
                entry("Institutional Partner", "redhouse studio", "https://www.redhousearchitecture.org/"),
                entry("Videography", "Blurry Pictures", "https://blurry-pictures.com/work"),
                entry("Lead Contamination Consulting", "Robin Brown", "https://www.facebook.com/groups/90189049894/"),
                entry("Demolition", "C&J Contractors", "https://cjcontractorsco.com/"),
                entry("Community Organizing", "Indigo Bishop", "https://www.instagram.com/indigo.bishop/"),
                entry("Funding", "Cleveland Transformative Arts Fund", "https://www.clevelandohio.gov/city-hall/office-mayor/taf"),
                entry("Branding and Website", "Harper Daniel", "https://harperdaniel.com"),
            ],
            prompts: vec![
                prompt("Interested in carrying the book?", "contact-1.png"),
                prompt("Showing the film?", "contact-2.jpg"),
                prompt("Scheduling a talk?", "contact-3.jpg"),
            ],
        }
    }
}

/// Page colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    /// Navigation, category labels, captions.
    pub text_muted: String,
    /// Modal and viewer backdrop.
    pub overlay: String,
    pub link_hover: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            overlay: "rgba(0, 0, 0, 0.92)".to_string(),
            link_hover: "#000000".to_string(),
        }
    }
}

/// A responsive CSS size expressed as `clamp(min, size, max)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    /// Preferred/fluid value, typically viewport-relative (e.g. `"6vw"`).
    pub size: String,
    pub min: String,
    pub max: String,
}

impl ClampSize {
    /// Render as a CSS `clamp()` expression.
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

/// Layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Hero and footer headline size.
    pub hero_text: ClampSize,
    /// Vertical gap between feed rows (CSS value).
    pub row_gap: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            hero_text: ClampSize {
                size: "6vw".to_string(),
                min: "2rem".to_string(),
                max: "5.5rem".to_string(),
            },
            row_gap: "6rem".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory over stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a commented `config.toml` covering the commonly tuned keys.
///
/// Used by the `gen-config` CLI command. Contact entries and prompts are
/// omitted; listing them in a user file replaces the stock lists.
pub fn stock_config_toml() -> &'static str {
    r##"# sophia-site configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory (next to this file) copied verbatim into the output root.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Content API
# ---------------------------------------------------------------------------
[api]
base_url = "https://api.are.na/v2"
# Items requested per channel; a single page is fetched (max 100).
per_page = 100
timeout_secs = 30

# ---------------------------------------------------------------------------
# Channel slug per category
# ---------------------------------------------------------------------------
[channels]
publication = "9413-sophia-ave-publication"
archive = "9413-sophia-ave-archive"
film = "9413-sophia-ave-film"

# ---------------------------------------------------------------------------
# Polling (`watch` command)
# ---------------------------------------------------------------------------
[poll]
interval_secs = 120

# ---------------------------------------------------------------------------
# Combined feed
# ---------------------------------------------------------------------------
[feed]
# Rows shown at first, and how many each "See N more" click adds.
page_size = 20

# ---------------------------------------------------------------------------
# Copy. Hero texts accept inline markdown; *emphasis* is animated.
# ---------------------------------------------------------------------------
[site]
title = "9413 Sophia Avenue"
hero_all = "The 9413 Sophia Avenue Project is a *choreographed deconstruction* of the built environment"
hero_publication = "The publication shows the dedication to the project and its content"
hero_film = "The film trailer is ready"
hero_archive = "The archive of the choreographed deconstruction is living"
footer = "Thank you for caring for this house with us."
footer_image = "footer-inverted.jpg"
# Used when there is no info.md next to this file.
info = "The 9413 Sophia Avenue Project is a choreographed deconstruction of the built environment."

# ---------------------------------------------------------------------------
# Contact modal
# ---------------------------------------------------------------------------
[contact]
heading = "Contact the Project Team"
email = "contact@9413sophia.com"
# [[contact.entries]]
# role = "Project Lead"
# name = "..."
# url = "https://..."

# ---------------------------------------------------------------------------
# Colors and layout
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"
overlay = "rgba(0, 0, 0, 0.92)"
link_hover = "#000000"

[theme]
row_gap = "6rem"

# Hero headline size, as CSS clamp(min, size, max).
[theme.hero_text]
size = "6vw"
min = "2rem"
max = "5.5rem"
"##
}

/// Generate CSS custom properties from color and theme config.
pub fn generate_theme_css(colors: &ColorConfig, theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-text: {text};
    --color-text-muted: {muted};
    --color-overlay: {overlay};
    --color-link-hover: {hover};
    --hero-text-size: {hero};
    --row-gap: {row_gap};
}}"#,
        bg = colors.background,
        text = colors.text,
        muted = colors.text_muted,
        overlay = colors.overlay,
        hover = colors.link_hover,
        hero = theme.hero_text.to_css(),
        row_gap = theme.row_gap,
    )
}
