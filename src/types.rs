//! Shared types used across the resolvers, the store and the generated
//! artifacts.
//!
//! A document is addressed by a slug (ordered path segments) and a locale.
//! Its href is the docs base path followed by the joined slug, which is also
//! the key the sidebar tree references it by.

use serde::{Deserialize, Serialize};

/// Category reported for a document whose slug is empty.
pub const ROOT_CATEGORY: &str = "docs";

/// A Markdown document as supplied by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Path segments, e.g. `["gameplay", "overview"]`.
    pub slug: Vec<String>,
    pub locale: String,
    /// Title from front matter, first `# ` heading, or humanized slug.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw Markdown body with front matter stripped.
    pub body: String,
}

impl Document {
    /// First slug segment, or [`ROOT_CATEGORY`].
    pub fn category(&self) -> &str {
        category_of(&self.slug)
    }

    /// Slug joined with `/`.
    pub fn slug_path(&self) -> String {
        self.slug.join("/")
    }

    /// Locale-independent href under `base_path` (`/docs/gameplay/overview`).
    pub fn href(&self, base_path: &str) -> String {
        slug_href(base_path, &self.slug)
    }
}

/// First slug segment, or [`ROOT_CATEGORY`] for an empty slug.
pub fn category_of(slug: &[String]) -> &str {
    slug.first().map(String::as_str).unwrap_or(ROOT_CATEGORY)
}

/// Join a slug under a base path: `("/docs", ["a", "b"])` → `/docs/a/b`.
///
/// An empty slug yields the base path itself.
pub fn slug_href(base_path: &str, slug: &[String]) -> String {
    if slug.is_empty() {
        base_path.to_string()
    } else {
        format!("{}/{}", base_path, slug.join("/"))
    }
}

/// Split a slash-separated slug string into segments, dropping empty ones.
///
/// `"gameplay/overview"`, `"/gameplay/overview/"` → `["gameplay", "overview"]`.
pub fn parse_slug(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Recover a slug from an href under `base_path`.
///
/// Returns `None` when the href is outside the base path
/// (`/tools/x` under `/docs`, or `/docsx` which merely shares a prefix).
pub fn href_to_slug(base_path: &str, href: &str) -> Option<Vec<String>> {
    let rest = href.strip_prefix(base_path)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(parse_slug(rest))
}
