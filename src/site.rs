//! The assembled documentation site.
//!
//! [`Site`] owns everything loaded at startup (config, sidebar, message
//! catalogs, document store) and answers per-page questions in terms a page
//! template can render directly: translated titles, locale-prefixed hrefs,
//! canonical URLs.
//!
//! ```text
//! Site::open(root)
//!   ├── config.toml   → SiteConfig
//!   ├── sidebar.toml  → Arc<Sidebar>       (immutable, shared)
//!   ├── messages/     → Translator
//!   └── content/      → FsStore            (read per request)
//!
//! site.page(slug, locale)
//!   document      ← store, default slug, locale fallback
//!   navigation    ← resolve_navigation     → NavLink (translated, prefixed)
//!   breadcrumbs   ← resolve_breadcrumb_path → BreadcrumbLink (last unlinked)
//!   verification  ← resolve_verification_status
//!   audience      ← Sidebar::audience_for
//!   headings      ← text::extract_headings
//! ```
//!
//! Search indexes are built per locale on first use and kept in
//! [`IndexHandle`]s; [`Site::refresh_index`] rebuilds one in place.

use crate::breadcrumb::resolve_breadcrumb_path;
use crate::config::{self, ConfigError, SiteConfig};
use crate::i18n::{I18nError, NavLink, Translator, localized_path};
use crate::navigation::{NavigationOrder, resolve_navigation};
use crate::search::{IndexHandle, SearchIndex, SearchOptions, SearchResponse};
use crate::sidebar::{Audience, DuplicateHref, Sidebar, SidebarError, SidebarNode};
use crate::store::{self, DocumentStore, FsStore, StoreError};
use crate::text::{Heading, extract_headings};
use crate::types::{Document, href_to_slug, slug_href};
use crate::verification::{VerificationStatus, resolve_verification_status};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Sidebar error: {0}")]
    Sidebar(#[from] SidebarError),
    #[error("Messages error: {0}")]
    I18n(#[from] I18nError),
    #[error("Content error: {0}")]
    Store(#[from] StoreError),
}

/// Previous/next links for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedNavigation {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// One rendered breadcrumb. The current page has no href.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbLink {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A language alternate of a page (`hreflang` → absolute URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub url: String,
}

/// Everything a page template needs for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocPage {
    pub document: Document,
    /// Locale the page was requested in; differs from `document.locale`
    /// when the default-locale document was served as a fallback.
    pub locale: String,
    /// Locale-independent href (`/docs/...`).
    pub href: String,
    pub canonical_url: String,
    pub alternates: Vec<Alternate>,
    pub headings: Vec<Heading>,
    pub navigation: LocalizedNavigation,
    pub breadcrumbs: Vec<BreadcrumbLink>,
    pub verification: VerificationStatus,
    /// Reader the page's sidebar section is written for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
}

impl DocPage {
    pub fn is_fallback(&self) -> bool {
        self.document.locale != self.locale
    }

    /// Pages in the events reference that nobody verified carry an
    /// "untested" warning.
    pub fn shows_untested_warning(&self) -> bool {
        self.verification.is_event_page && !self.verification.verified
    }
}

/// Consistency report for `docnav check`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub sidebar_nodes: usize,
    pub navigable_entries: usize,
    pub documents: usize,
    pub duplicate_hrefs: Vec<DuplicateHref>,
    /// Sidebar hrefs under the docs base path with no default-locale document.
    pub missing_documents: Vec<String>,
    /// Default-locale documents not referenced by the sidebar.
    pub orphan_documents: Vec<String>,
    /// Redirects whose target is neither a sidebar href nor a document.
    pub dangling_redirects: Vec<(String, String)>,
}

impl CheckReport {
    /// Orphans are reported but do not fail the check.
    pub fn is_ok(&self) -> bool {
        self.duplicate_hrefs.is_empty()
            && self.missing_documents.is_empty()
            && self.dangling_redirects.is_empty()
    }
}

#[derive(Debug, Default)]
struct LocaleIndex {
    handle: IndexHandle,
    built: AtomicBool,
}

pub struct Site {
    config: SiteConfig,
    sidebar: Arc<Sidebar>,
    order: NavigationOrder,
    translator: Translator,
    store: Arc<dyn DocumentStore>,
    indexes: BTreeMap<String, LocaleIndex>,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("config", &self.config)
            .field("sidebar_nodes", &self.sidebar.node_count())
            .field("locales", &self.indexes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Site {
    /// Load a site from its root directory.
    pub fn open(root: &Path) -> Result<Self, SiteError> {
        let config = config::load_config(root)?;
        let sidebar = Sidebar::load(&root.join(&config.sidebar_file))?;
        let translator = Translator::load(&root.join(&config.messages_dir), &config.i18n)?;
        let store = FsStore::new(root.join(&config.content_dir));
        tracing::info!(
            root = %root.display(),
            locales = ?config.i18n.locales,
            nodes = sidebar.node_count(),
            "opened site"
        );
        Ok(Self::from_parts(config, sidebar, translator, store))
    }

    /// Assemble a site from in-memory parts.
    pub fn from_parts(
        config: SiteConfig,
        sidebar: Sidebar,
        translator: Translator,
        store: impl DocumentStore + 'static,
    ) -> Self {
        let indexes = config
            .i18n
            .locales
            .iter()
            .map(|locale| (locale.clone(), LocaleIndex::default()))
            .collect();
        Self {
            order: NavigationOrder::new(&sidebar),
            sidebar: Arc::new(sidebar),
            config,
            translator,
            store: Arc::new(store),
            indexes,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn sidebar(&self) -> &Arc<Sidebar> {
        &self.sidebar
    }

    /// Flattened reading order, computed once at load.
    pub fn reading_order(&self) -> &NavigationOrder {
        &self.order
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    fn base_path(&self) -> &str {
        &self.config.docs.base_path
    }

    /// Unsupported locales are served as the default locale.
    pub fn resolve_locale<'a>(&'a self, locale: &'a str) -> &'a str {
        if self.config.i18n.is_supported(locale) {
            locale
        } else {
            &self.config.i18n.default_locale
        }
    }

    /// The slug actually served: an empty slug means the default page.
    pub fn effective_slug<'a>(&'a self, slug: &'a [String]) -> &'a [String] {
        if slug.is_empty() {
            &self.config.docs.default_slug
        } else {
            slug
        }
    }

    /// Locale-independent href of a slug.
    pub fn href_for(&self, slug: &[String]) -> String {
        slug_href(self.base_path(), self.effective_slug(slug))
    }

    /// Slug of a locale-independent href, if it is under the docs path.
    pub fn slug_for(&self, href: &str) -> Option<Vec<String>> {
        href_to_slug(self.base_path(), href)
    }

    /// Fetch a document, falling back to the default locale when the
    /// translation is missing and fallback is enabled.
    pub fn document(&self, slug: &[String], locale: &str) -> Result<Option<Document>, SiteError> {
        let slug = self.effective_slug(slug);
        let locale = self.resolve_locale(locale);
        if let Some(doc) = self.store.get_document(slug, locale)? {
            return Ok(Some(doc));
        }
        let default = &self.config.i18n.default_locale;
        if self.config.i18n.fallback_to_default && locale != default {
            tracing::debug!(locale, slug = %slug.join("/"), "falling back to default locale");
            return Ok(self.store.get_document(slug, default)?);
        }
        Ok(None)
    }

    /// Every document of a locale, in listing order. No fallback.
    pub fn documents(&self, locale: &str) -> Result<Vec<Document>, SiteError> {
        Ok(store::load_all(self.store.as_ref(), self.resolve_locale(locale))?)
    }

    pub fn navigation(&self, slug: &[String], locale: &str) -> LocalizedNavigation {
        let locale = self.resolve_locale(locale);
        let nav = resolve_navigation(&self.sidebar, self.base_path(), self.effective_slug(slug));
        let link = |entry: &crate::navigation::FlattenedEntry| {
            NavLink::from_entry(entry, locale, &self.translator, &self.config.i18n)
        };
        LocalizedNavigation {
            prev: nav.prev.as_ref().map(link),
            next: nav.next.as_ref().map(link),
        }
    }

    /// Breadcrumbs for a locale-independent href. The last item (the
    /// current page) is not linked.
    pub fn breadcrumbs_for_href(&self, href: &str, locale: &str) -> Vec<BreadcrumbLink> {
        let locale = self.resolve_locale(locale);
        let path = resolve_breadcrumb_path(&self.sidebar, href);
        let last = path.len().saturating_sub(1);
        path.into_iter()
            .enumerate()
            .map(|(i, item)| BreadcrumbLink {
                label: self.translator.sidebar_title(locale, &item.title_key),
                href: if i == last {
                    None
                } else {
                    item.href
                        .map(|h| localized_path(locale, &h, &self.config.i18n))
                },
            })
            .collect()
    }

    pub fn breadcrumbs(&self, slug: &[String], locale: &str) -> Vec<BreadcrumbLink> {
        self.breadcrumbs_for_href(&self.href_for(slug), locale)
    }

    pub fn verification(&self, slug: &[String]) -> VerificationStatus {
        resolve_verification_status(&self.sidebar, &self.href_for(slug))
    }

    /// Absolute URL of an href in a locale.
    pub fn absolute_url(&self, locale: &str, href: &str) -> String {
        format!(
            "{}{}",
            self.config.origin(),
            localized_path(locale, href, &self.config.i18n)
        )
    }

    /// Build the full page context, or `None` when no document exists.
    pub fn page(&self, slug: &[String], locale: &str) -> Result<Option<DocPage>, SiteError> {
        let locale = self.resolve_locale(locale);
        let Some(document) = self.document(slug, locale)? else {
            return Ok(None);
        };
        let href = self.href_for(slug);

        let mut alternates: Vec<Alternate> = self
            .config
            .i18n
            .locales
            .iter()
            .map(|l| Alternate {
                hreflang: l.clone(),
                url: self.absolute_url(l, &href),
            })
            .collect();
        alternates.push(Alternate {
            hreflang: "x-default".to_string(),
            url: self.absolute_url(&self.config.i18n.default_locale, &href),
        });

        Ok(Some(DocPage {
            headings: extract_headings(&document.body),
            navigation: self.navigation(slug, locale),
            breadcrumbs: self.breadcrumbs_for_href(&href, locale),
            verification: resolve_verification_status(&self.sidebar, &href),
            audience: self.sidebar.audience_for(&href),
            canonical_url: self.absolute_url(locale, &href),
            alternates,
            locale: locale.to_string(),
            href,
            document,
        }))
    }

    /// Search the documents of a locale.
    ///
    /// The locale's index is built on first use. `limit` defaults to
    /// `search.default_limit` and is clamped to `search.max_limit`.
    pub fn search(
        &self,
        query: &str,
        locale: &str,
        limit: Option<usize>,
    ) -> Result<SearchResponse, SiteError> {
        let index = self.search_index(locale)?;
        let limit = self.config.search.effective_limit(limit);
        Ok(SearchResponse {
            results: index.search(query, limit),
        })
    }

    /// Current search index of a locale, built if it never was.
    pub fn search_index(&self, locale: &str) -> Result<Arc<SearchIndex>, SiteError> {
        let locale = self.resolve_locale(locale);
        let Some(slot) = self.indexes.get(locale) else {
            return Ok(Arc::new(SearchIndex::default()));
        };
        if !slot.built.load(Ordering::Acquire) {
            self.rebuild(locale, slot)?;
        }
        Ok(slot.handle.snapshot())
    }

    /// Rebuild the search index of a locale from the store. Returns whether
    /// the index changed.
    pub fn refresh_index(&self, locale: &str) -> Result<bool, SiteError> {
        let locale = self.resolve_locale(locale);
        match self.indexes.get(locale) {
            Some(slot) => self.rebuild(locale, slot),
            None => Ok(false),
        }
    }

    fn rebuild(&self, locale: &str, slot: &LocaleIndex) -> Result<bool, SiteError> {
        let changed = slot.handle.refresh(
            self.store.as_ref(),
            locale,
            self.base_path(),
            SearchOptions::from(&self.config.search),
        )?;
        slot.built.store(true, Ordering::Release);
        Ok(changed)
    }

    /// Cross-check the sidebar against the default-locale documents.
    pub fn check(&self) -> Result<CheckReport, SiteError> {
        let default = self.config.i18n.default_locale.as_str();
        let slugs = self.store.list_all_slugs(default)?;
        let doc_hrefs: HashSet<String> = slugs
            .iter()
            .map(|slug| slug_href(self.base_path(), slug))
            .collect();

        let mut sidebar_hrefs = HashSet::new();
        collect_hrefs(&self.sidebar.items, &mut sidebar_hrefs);

        let mut reported = HashSet::new();
        let missing_documents: Vec<String> = self
            .order
            .entries()
            .iter()
            .filter(|e| self.slug_for(&e.href).is_some() && !doc_hrefs.contains(&e.href))
            .filter(|e| reported.insert(e.href.as_str()))
            .map(|e| e.href.clone())
            .collect();

        let orphan_documents = slugs
            .iter()
            .map(|slug| slug_href(self.base_path(), slug))
            .filter(|href| !sidebar_hrefs.contains(href.as_str()))
            .collect();

        let dangling_redirects = self
            .sidebar
            .redirects
            .iter()
            .filter(|(_, to)| {
                !sidebar_hrefs.contains(to.as_str()) && !doc_hrefs.contains(to.as_str())
            })
            .map(|(from, to)| (from.clone(), to.clone()))
            .collect();

        Ok(CheckReport {
            sidebar_nodes: self.sidebar.node_count(),
            navigable_entries: self.order.len(),
            documents: slugs.len(),
            duplicate_hrefs: self.sidebar.duplicate_hrefs(),
            missing_documents,
            orphan_documents,
            dangling_redirects,
        })
    }
}

fn collect_hrefs<'a>(nodes: &'a [SidebarNode], out: &mut HashSet<&'a str>) {
    for node in nodes {
        if let Some(href) = node.href.as_deref() {
            out.insert(href);
        }
        collect_hrefs(&node.children, out);
    }
}
