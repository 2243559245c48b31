//! Free-text search over every document of a locale.
//!
//! The index is a flat list of entries in document order with their title,
//! description and body lowercased once at build time. A query is a
//! case-insensitive substring, matched against each field:
//!
//! | Tier | Matches in             |
//! |------|------------------------|
//! | 1    | title                  |
//! | 2    | description (not title)|
//! | 3    | body only              |
//!
//! Results are ordered by tier, then by document order within a tier. There
//! is no scoring beyond that. [`group_by_category`] regroups a ranked list
//! for display without reordering within a category.
//!
//! ## Query Coercion
//!
//! Queries are never rejected. Control characters are removed, surrounding
//! whitespace trimmed, and the length capped at `max_query_chars`
//! characters. A query that is empty after this returns no results, as does
//! a limit of zero.
//!
//! ## Rebuilds
//!
//! [`IndexHandle`] holds the current index behind an `RwLock<Arc<_>>`.
//! Readers take an `Arc` snapshot and search without holding the lock; a
//! rebuild constructs the new index first and only then swaps the pointer,
//! so a reader sees either the old index or the new one, never a mix.

use crate::config::SearchConfig;
use crate::store::{self, DocumentStore, StoreError};
use crate::text::{excerpt, fold_case, plain_text};
use crate::types::{Document, category_of};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::{Arc, RwLock};

/// Tunables applied at build and query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_query_chars: usize,
    pub snippet_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_query_chars: config.max_query_chars,
            snippet_chars: config.snippet_chars,
        }
    }
}

/// One searchable document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchIndexEntry {
    pub title: String,
    pub description: Option<String>,
    /// Raw Markdown body.
    pub body: String,
    pub href: String,
    /// First slug segment, or `docs` for the root document.
    pub category: String,
}

#[derive(Debug, Clone)]
struct Prepared {
    entry: SearchIndexEntry,
    title_lc: String,
    description_lc: String,
    body_lc: String,
    /// Markup-free body used for snippets.
    text: String,
}

impl Prepared {
    fn new(doc: &Document, base_path: &str) -> Self {
        let description = doc.description.clone();
        Self {
            title_lc: fold_case(&doc.title),
            description_lc: fold_case(description.as_deref().unwrap_or_default()),
            body_lc: fold_case(&doc.body),
            text: plain_text(&doc.body),
            entry: SearchIndexEntry {
                title: doc.title.clone(),
                description,
                body: doc.body.clone(),
                href: doc.href(base_path),
                category: category_of(&doc.slug).to_string(),
            },
        }
    }

    fn tier(&self, needle: &str) -> Option<usize> {
        if self.title_lc.contains(needle) {
            Some(0)
        } else if self.description_lc.contains(needle) {
            Some(1)
        } else if self.body_lc.contains(needle) {
            Some(2)
        } else {
            None
        }
    }
}

/// A ranked hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub description: Option<String>,
    pub href: String,
    /// Plain-text excerpt around the first match.
    #[serde(rename = "content")]
    pub snippet: String,
    pub category: String,
}

/// Wire shape of a search response: `{"results": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Results sharing a category, for grouped display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub results: Vec<SearchResult>,
}

/// Immutable search index over one locale.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<Prepared>,
    /// Categories in order of first appearance.
    categories: Vec<String>,
    options: SearchOptions,
}

impl SearchIndex {
    /// Index `documents` with default options.
    pub fn build(documents: &[Document], base_path: &str) -> Self {
        Self::build_with(documents, base_path, SearchOptions::default())
    }

    /// Index `documents`, preparing them in parallel. Entry order is the
    /// order of `documents`.
    pub fn build_with(documents: &[Document], base_path: &str, options: SearchOptions) -> Self {
        let entries: Vec<Prepared> = documents
            .par_iter()
            .map(|doc| Prepared::new(doc, base_path))
            .collect();

        let mut categories: Vec<String> = Vec::new();
        for prepared in &entries {
            if !categories.contains(&prepared.entry.category) {
                categories.push(prepared.entry.category.clone());
            }
        }

        Self {
            entries,
            categories,
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SearchIndexEntry> {
        self.entries.iter().map(|p| &p.entry)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Ranked results for `query`, at most `limit` of them.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = sanitize_query(query, self.options.max_query_chars);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let needle = fold_case(&query);

        let mut tiers: [Vec<&Prepared>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for prepared in &self.entries {
            if let Some(tier) = prepared.tier(&needle) {
                tiers[tier].push(prepared);
            }
        }

        let results: Vec<SearchResult> = tiers
            .iter()
            .flatten()
            .take(limit)
            .map(|p| SearchResult {
                title: p.entry.title.clone(),
                description: p.entry.description.clone(),
                href: p.entry.href.clone(),
                snippet: excerpt(&p.text, &query, self.options.snippet_chars),
                category: p.entry.category.clone(),
            })
            .collect();

        tracing::debug!(query = %query, hits = results.len(), "search");
        results
    }

    /// SHA-256 over every entry's href, title, description and body, as
    /// hex. Equal fingerprints mean equal search behavior.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for prepared in &self.entries {
            let entry = &prepared.entry;
            hasher.update(entry.href.as_bytes());
            hasher.update(b"\0");
            hasher.update(entry.title.as_bytes());
            hasher.update(b"\0");
            match &entry.description {
                Some(description) => {
                    hasher.update(b"\x01");
                    hasher.update(description.as_bytes());
                }
                None => hasher.update(b"\x00"),
            }
            hasher.update(b"\0");
            hasher.update(entry.body.as_bytes());
            hasher.update(b"\0\0");
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Coerce raw user input into a query: control characters removed,
/// whitespace trimmed, at most `max_chars` characters.
pub fn sanitize_query(raw: &str, max_chars: usize) -> String {
    let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    cleaned
        .trim()
        .chars()
        .take(max_chars)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Group ranked results by category, categories in order of first
/// appearance, results keeping their relative order.
pub fn group_by_category(results: Vec<SearchResult>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|g| g.category == result.category) {
            Some(group) => group.results.push(result),
            None => groups.push(CategoryGroup {
                category: result.category.clone(),
                results: vec![result],
            }),
        }
    }
    groups
}

/// The current index of one locale, replaceable while readers hold
/// snapshots of the previous one.
#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Arc<SearchIndex>>,
}

impl IndexHandle {
    pub fn new(index: SearchIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The index as of now. Later swaps do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<SearchIndex> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new index, returning the previous one.
    pub fn replace(&self, index: SearchIndex) -> Arc<SearchIndex> {
        let next = Arc::new(index);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }

    /// Rebuild from the store and swap only if the content changed.
    ///
    /// Returns whether a swap happened. The new index is built before the
    /// lock is taken.
    pub fn refresh(
        &self,
        store: &dyn DocumentStore,
        locale: &str,
        base_path: &str,
        options: SearchOptions,
    ) -> Result<bool, StoreError> {
        let documents = store::load_all(store, locale)?;
        let index = SearchIndex::build_with(&documents, base_path, options);
        let current = self.snapshot();
        if index.options == current.options && index.fingerprint() == current.fingerprint() {
            tracing::debug!(locale, documents = index.len(), "search index unchanged");
            return Ok(false);
        }
        tracing::info!(locale, documents = index.len(), "search index rebuilt");
        self.replace(index);
        Ok(true)
    }
}
