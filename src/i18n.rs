//! Locale-aware titles and URLs.
//!
//! The sidebar tree and the navigation order are locale-independent: nodes
//! carry translation keys, and hrefs carry no locale. This module turns
//! those into what a reader in a given locale sees.
//!
//! ## Message Catalogs
//!
//! One JSON file per locale under `messages/`, grouped by namespace:
//!
//! ```json
//! {
//!   "sidebar": { "introduction": "Introduction", "playerGuide": "Player Guide" },
//!   "docs": { "previous": "Previous", "next": "Next" }
//! }
//! ```
//!
//! Keys may be dotted to reach nested objects (`"events.chat"`). A lookup
//! tries the requested locale, then the default locale, then returns the key
//! itself, so a missing translation degrades to a visible key instead of
//! failing the page.
//!
//! ## URL Prefixes
//!
//! Locale prefixes are applied "as needed": the default locale is served
//! without one (`/docs/intro`), every other locale with one
//! (`/fr/docs/intro`).

use crate::config::I18nConfig;
use crate::navigation::FlattenedEntry;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Namespace holding sidebar titles.
pub const SIDEBAR_NAMESPACE: &str = "sidebar";

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid message catalog {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Message catalog {0} must be a JSON object")]
    NotAnObject(PathBuf),
}

/// Per-locale message catalogs with default-locale fallback.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    default_locale: String,
    catalogs: HashMap<String, Value>,
}

impl Translator {
    pub fn new(default_locale: &str) -> Self {
        Self {
            default_locale: default_locale.to_string(),
            catalogs: HashMap::new(),
        }
    }

    /// Add (or replace) the catalog of a locale.
    pub fn with_catalog(mut self, locale: &str, catalog: Value) -> Self {
        self.catalogs.insert(locale.to_string(), catalog);
        self
    }

    /// Load `<dir>/<locale>.json` for every configured locale.
    ///
    /// A missing file leaves that locale without a catalog (logged); an
    /// unreadable or malformed one is an error.
    pub fn load(dir: &Path, i18n: &I18nConfig) -> Result<Self, I18nError> {
        let mut translator = Self::new(&i18n.default_locale);
        for locale in &i18n.locales {
            let path = dir.join(format!("{}.json", locale));
            if !path.exists() {
                tracing::warn!(locale = %locale, path = %path.display(), "no message catalog");
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|source| I18nError::Io {
                path: path.clone(),
                source,
            })?;
            let catalog: Value = serde_json::from_str(&content).map_err(|source| {
                I18nError::Json {
                    path: path.clone(),
                    source,
                }
            })?;
            if !catalog.is_object() {
                return Err(I18nError::NotAnObject(path));
            }
            translator.catalogs.insert(locale.clone(), catalog);
        }
        tracing::debug!(catalogs = translator.catalogs.len(), "loaded message catalogs");
        Ok(translator)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn has_catalog(&self, locale: &str) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Exact lookup in one locale, no fallback.
    pub fn lookup(&self, locale: &str, namespace: &str, key: &str) -> Option<&str> {
        let mut node = self.catalogs.get(locale)?.get(namespace)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        node.as_str()
    }

    /// Translate with fallback: `locale`, then the default locale, then the
    /// key itself.
    pub fn t(&self, locale: &str, namespace: &str, key: &str) -> String {
        self.lookup(locale, namespace, key)
            .or_else(|| self.lookup(&self.default_locale, namespace, key))
            .unwrap_or(key)
            .to_string()
    }

    /// Title of a sidebar node.
    pub fn sidebar_title(&self, locale: &str, key: &str) -> String {
        self.t(locale, SIDEBAR_NAMESPACE, key)
    }
}

/// Prefix `path` with the locale unless it is the default one.
///
/// `("fr", "/docs/intro")` → `/fr/docs/intro`; `("fr", "/")` → `/fr`;
/// `("en", "/docs/intro")` → `/docs/intro`.
pub fn localized_path(locale: &str, path: &str, i18n: &I18nConfig) -> String {
    if locale == i18n.default_locale {
        path.to_string()
    } else if path == "/" || path.is_empty() {
        format!("/{}", locale)
    } else {
        format!("/{}{}", locale, path)
    }
}

/// Split a leading locale segment off a URL path.
///
/// Returns the detected locale and the remaining path (at least `/`). A
/// path without a supported locale segment belongs to the default locale
/// and is returned unchanged.
pub fn split_locale<'a>(path: &'a str, i18n: &'a I18nConfig) -> (&'a str, &'a str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = match trimmed.find('/') {
        Some(i) => (&trimmed[..i], &trimmed[i..]),
        None => (trimmed, ""),
    };
    if i18n.is_supported(first) {
        (first, if rest.is_empty() { "/" } else { rest })
    } else {
        (i18n.default_locale.as_str(), path)
    }
}

/// A navigation link as rendered for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Locale-prefixed href.
    pub href: String,
    pub title: String,
}

impl NavLink {
    pub fn from_entry(
        entry: &FlattenedEntry,
        locale: &str,
        translator: &Translator,
        i18n: &I18nConfig,
    ) -> Self {
        Self {
            href: localized_path(locale, &entry.href, i18n),
            title: translator.sidebar_title(locale, &entry.title_key),
        }
    }
}
