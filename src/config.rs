//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `config.toml`. Stock
//! defaults are serialized to a TOML table and the user's file is merged on
//! top, so a config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `config.toml` lives at the site root, next to the sidebar and the
//! content directory:
//!
//! ```text
//! site/
//! ├── config.toml              # Site config (optional)
//! ├── sidebar.toml             # Sidebar tree + redirects
//! ├── messages/
//! │   ├── en.json              # Translation catalog per locale
//! │   └── fr.json
//! └── content/
//!     ├── en/
//!     │   ├── intro.md
//!     │   └── gameplay/overview.md
//!     └── fr/
//!         └── intro.md
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! base_url = "https://example.com"
//! site_title = "Documentation"
//! content_dir = "content"
//! sidebar_file = "sidebar.toml"
//! messages_dir = "messages"
//!
//! [docs]
//! base_path = "/docs"         # URL prefix of every document
//! default_slug = ["intro"]    # Served for an empty slug
//!
//! [i18n]
//! locales = ["en", "fr", "es"]
//! default_locale = "en"       # Served without a URL prefix
//! fallback_to_default = true  # Missing translation → default-locale doc
//!
//! [search]
//! default_limit = 20
//! max_limit = 100
//! max_query_chars = 200       # Longer queries are truncated
//! snippet_chars = 160
//!
//! [sitemap]
//! changefreq = "weekly"
//! priority = 0.6
//! static_pages = []
//!
//! [categories]                # Display names for first slug segments
//! api = "API Reference"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file at the site root.
pub const CONFIG_FILENAME: &str = "config.toml";

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
///
/// All fields have defaults. User config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute origin used in canonical URLs, `llms.txt` and the sitemap.
    pub base_url: String,
    /// Site name, used as the `llms.txt` heading.
    pub site_title: String,
    /// One-line summary quoted under the `llms.txt` heading.
    pub site_summary: String,
    /// Directory holding `<locale>/<slug>.md` files, relative to the site root.
    pub content_dir: String,
    /// Sidebar tree file, relative to the site root.
    pub sidebar_file: String,
    /// Directory holding `<locale>.json` message catalogs.
    pub messages_dir: String,
    pub docs: DocsConfig,
    pub i18n: I18nConfig,
    pub search: SearchConfig,
    pub sitemap: SitemapConfig,
    /// Display names for categories (first slug segment).
    pub categories: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com".to_string(),
            site_title: "Documentation".to_string(),
            site_summary: String::new(),
            content_dir: "content".to_string(),
            sidebar_file: "sidebar.toml".to_string(),
            messages_dir: "messages".to_string(),
            docs: DocsConfig::default(),
            i18n: I18nConfig::default(),
            search: SearchConfig::default(),
            sitemap: SitemapConfig::default(),
            categories: BTreeMap::new(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales must not be empty".into(),
            ));
        }
        if !self.i18n.locales.contains(&self.i18n.default_locale) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale '{}' is not listed in i18n.locales",
                self.i18n.default_locale
            )));
        }
        if !self.docs.base_path.starts_with('/') || self.docs.base_path.ends_with('/') {
            return Err(ConfigError::Validation(
                "docs.base_path must start with '/' and have no trailing slash".into(),
            ));
        }
        if self.search.max_limit == 0
            || self.search.default_limit == 0
            || self.search.default_limit > self.search.max_limit
        {
            return Err(ConfigError::Validation(
                "search.default_limit must be between 1 and search.max_limit".into(),
            ));
        }
        if self.search.max_query_chars == 0 {
            return Err(ConfigError::Validation(
                "search.max_query_chars must be non-zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sitemap.priority) {
            return Err(ConfigError::Validation(
                "sitemap.priority must be 0.0-1.0".into(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Display name for a category, from `[categories]` or the segment
    /// itself with its first letter capitalized.
    pub fn category_name(&self, category: &str) -> String {
        match self.categories.get(category) {
            Some(name) => name.clone(),
            None => crate::naming::capitalize(category),
        }
    }
}

/// Document URL settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// URL prefix shared by every document href (`/docs`).
    pub base_path: String,
    /// Slug served when the request carries none.
    pub default_slug: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_path: "/docs".to_string(),
            default_slug: vec!["intro".to_string()],
        }
    }
}

/// Locale settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    pub locales: Vec<String>,
    /// Locale served without a URL prefix.
    pub default_locale: String,
    /// Serve the default-locale document when a translation is missing.
    pub fallback_to_default: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "fr".to_string(), "es".to_string()],
            default_locale: "en".to_string(),
            fallback_to_default: true,
        }
    }
}

impl I18nConfig {
    pub fn is_supported(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }
}

/// Search query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Result count when the caller does not ask for one.
    pub default_limit: usize,
    /// Larger requested limits are clamped to this.
    pub max_limit: usize,
    /// Queries are truncated to this many characters.
    pub max_query_chars: usize,
    /// Length of the content snippet attached to each result.
    pub snippet_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            max_query_chars: 200,
            snippet_chars: 160,
        }
    }
}

impl SearchConfig {
    /// Resolve a caller-supplied limit against the configured bounds.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// `changefreq` for document entries.
    pub changefreq: String,
    /// `priority` for document entries.
    pub priority: f32,
    /// Non-document paths (e.g. `/tools`) listed for every locale.
    pub static_pages: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            changefreq: "weekly".to_string(),
            priority: 0.6,
            static_pages: Vec::new(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
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
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
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

/// Load the site config from `config.toml` in `root`, on top of stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = load_raw_config(root)?;
    if overlay.is_none() {
        tracing::debug!(root = %root.display(), "no config.toml, using stock defaults");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docnav configuration
# ====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Public origin of the site, used for canonical URLs, llms.txt and sitemap.xml.
base_url = "https://example.com"

# Heading and summary of the generated llms.txt.
site_title = "Documentation"
site_summary = ""

# Markdown sources: <content_dir>/<locale>/<slug>.md (or .mdx).
content_dir = "content"

# Sidebar tree (navigation order, breadcrumbs, verification flags, redirects).
sidebar_file = "sidebar.toml"

# Translation catalogs: <messages_dir>/<locale>.json.
messages_dir = "messages"

# ---------------------------------------------------------------------------
# Document URLs
# ---------------------------------------------------------------------------
[docs]
# Prefix of every document href. Must start with "/" and not end with one.
base_path = "/docs"

# Slug served for the bare docs root.
default_slug = ["intro"]

# ---------------------------------------------------------------------------
# Locales
# ---------------------------------------------------------------------------
[i18n]
locales = ["en", "fr", "es"]

# The default locale is served without a URL prefix (/docs/...), the
# others with one (/fr/docs/...).
default_locale = "en"

# Serve the default-locale document when a translation does not exist.
fallback_to_default = true

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Results returned when the caller does not ask for a count.
default_limit = 20

# Upper bound on requested result counts.
max_limit = 100

# Queries longer than this (in characters) are truncated.
max_query_chars = 200

# Length of the content snippet attached to each result.
snippet_chars = 160

# ---------------------------------------------------------------------------
# Sitemap
# ---------------------------------------------------------------------------
[sitemap]
changefreq = "weekly"
priority = 0.6

# Non-document pages to list for every locale, e.g. ["/tools"].
static_pages = []

# ---------------------------------------------------------------------------
# Category display names (first slug segment → label)
# ---------------------------------------------------------------------------
[categories]
# "getting-started" = "Getting Started"
# api = "API Reference"
"##
}
