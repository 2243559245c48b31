//! Document storage: where Markdown documents come from.
//!
//! Everything above this module sees documents through the [`DocumentStore`]
//! trait, keyed by `(slug, locale)`. Two implementations ship:
//!
//! - [`FsStore`] reads `<content_dir>/<locale>/**/*.md` (or `.mdx`) from disk
//! - [`MemoryStore`] holds documents built in code, for tests and embedders
//!
//! ## Filesystem Layout
//!
//! ```text
//! content/
//! ├── en/
//! │   ├── intro.md                  → ["intro"]
//! │   ├── gameplay/
//! │   │   └── overview.md           → ["gameplay", "overview"]
//! │   └── plugins/
//! │       ├── index.md              → ["plugins"]
//! │       └── getting-started.mdx   → ["plugins", "getting-started"]
//! └── fr/
//!     └── intro.md
//! ```
//!
//! Files and directories starting with `.` or `_` are ignored. Listing is
//! sorted by file name at every level, so the order is stable across runs.
//!
//! ## Titles
//!
//! A document's title comes from its front matter, else its first `# `
//! heading, else its last slug segment humanized (`getting-started` →
//! `Getting started`).

use crate::frontmatter;
use crate::naming::humanize;
use crate::types::{Document, ROOT_CATEGORY};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Front matter error in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Source of documents, keyed by `(slug, locale)`.
///
/// A missing document is `Ok(None)`, never an error. Implementations are
/// shared across threads by the site and the index builder.
pub trait DocumentStore: Send + Sync {
    fn get_document(&self, slug: &[String], locale: &str) -> Result<Option<Document>, StoreError>;

    /// Every slug available in `locale`, in a stable order.
    fn list_all_slugs(&self, locale: &str) -> Result<Vec<Vec<String>>, StoreError>;
}

/// Load every document of a locale in listing order.
///
/// Listed documents that vanish or fail to load are skipped with a warning;
/// only a failure to list at all is an error.
pub fn load_all(store: &dyn DocumentStore, locale: &str) -> Result<Vec<Document>, StoreError> {
    let slugs = store.list_all_slugs(locale)?;
    let mut documents = Vec::with_capacity(slugs.len());
    for slug in &slugs {
        match store.get_document(slug, locale) {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => {
                tracing::debug!(locale, slug = %slug.join("/"), "listed document disappeared");
            }
            Err(e) => {
                tracing::warn!(
                    locale,
                    slug = %slug.join("/"),
                    error = %e,
                    "skipping unreadable document"
                );
            }
        }
    }
    Ok(documents)
}

// ============================================================================
// In-memory store
// ============================================================================

type DocKey = (String, Vec<String>);

/// Documents held in memory. Listing follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: BTreeMap<DocKey, Document>,
    order: Vec<DocKey>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut store = Self::new();
        for doc in documents {
            store.insert(doc);
        }
        store
    }

    /// Add or replace a document. A replaced document keeps its listing
    /// position.
    pub fn insert(&mut self, doc: Document) {
        let key = (doc.locale.clone(), doc.slug.clone());
        if self.docs.insert(key.clone(), doc).is_none() {
            self.order.push(key);
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get_document(&self, slug: &[String], locale: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .docs
            .get(&(locale.to_string(), slug.to_vec()))
            .cloned())
    }

    fn list_all_slugs(&self, locale: &str) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self
            .order
            .iter()
            .filter(|(l, _)| l == locale)
            .map(|(_, slug)| slug.clone())
            .collect())
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

const EXTENSIONS: &[&str] = &["md", "mdx"];

/// Documents read from a content directory on every call.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file backing `(slug, locale)`, if any.
    ///
    /// `<slug>.md` wins over `<slug>.mdx`, which wins over
    /// `<slug>/index.md`. Only slugs [`list_all_slugs`] could produce
    /// resolve: segments that could escape the content directory, hidden
    /// or `_`-prefixed segments and a trailing `index` resolve to nothing.
    ///
    /// [`list_all_slugs`]: DocumentStore::list_all_slugs
    pub fn resolve_file(&self, slug: &[String], locale: &str) -> Option<PathBuf> {
        if !is_safe_segment(locale)
            || !slug.iter().all(|s| is_safe_segment(s) && !is_ignored(s))
            || slug.last().is_some_and(|s| s == "index")
        {
            return None;
        }
        let mut base = self.root.join(locale);
        for segment in slug {
            base.push(segment);
        }

        let mut candidates = Vec::with_capacity(4);
        if !slug.is_empty() {
            candidates.extend(EXTENSIONS.iter().map(|ext| {
                let mut file = base.clone().into_os_string();
                file.push(".");
                file.push(ext);
                PathBuf::from(file)
            }));
        }
        candidates.extend(EXTENSIONS.iter().map(|ext| base.join(format!("index.{}", ext))));
        candidates.into_iter().find(|p| p.is_file())
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\'])
}

impl DocumentStore for FsStore {
    fn get_document(&self, slug: &[String], locale: &str) -> Result<Option<Document>, StoreError> {
        let Some(path) = self.resolve_file(slug, locale) else {
            return Ok(None);
        };
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let (front, body) = frontmatter::parse(&content)
            .map_err(|source| StoreError::FrontMatter { path, source })?;

        let title = front
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| first_heading(body))
            .unwrap_or_else(|| {
                humanize(slug.last().map(String::as_str).unwrap_or(ROOT_CATEGORY))
            });

        Ok(Some(Document {
            slug: slug.to_vec(),
            locale: locale.to_string(),
            title,
            description: front.description.filter(|d| !d.trim().is_empty()),
            body: body.to_string(),
        }))
    }

    fn list_all_slugs(&self, locale: &str) -> Result<Vec<Vec<String>>, StoreError> {
        if !is_safe_segment(locale) {
            return Ok(Vec::new());
        }
        let dir = self.root.join(locale);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut slugs = Vec::new();
        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(&e.file_name().to_string_lossy()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(slug) = slug_for(&dir, entry.path()) else {
                continue;
            };
            if seen.insert(slug.clone()) {
                slugs.push(slug);
            }
        }
        Ok(slugs)
    }
}

fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Slug of a content file relative to its locale directory, or `None` for
/// non-document files.
fn slug_for(locale_dir: &Path, path: &Path) -> Option<Vec<String>> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    let rel = path.strip_prefix(locale_dir).ok()?.with_extension("");
    let mut slug: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if slug.last().is_some_and(|s| s == "index") {
        slug.pop();
    }
    Some(slug)
}

/// Text of the first level-one ATX heading outside code fences.
fn first_heading(body: &str) -> Option<String> {
    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(text) = trimmed.strip_prefix("# ") {
            let text = text.trim().trim_end_matches('#').trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::parse_slug;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    // =========================================================================
    // MemoryStore
    // =========================================================================

    #[test]
    fn memory_store_lists_in_insertion_order() {
        let store = MemoryStore::from_documents(vec![
            doc("en", "zeta", "Zeta", None, ""),
            doc("fr", "alpha", "Alpha", None, ""),
            doc("en", "alpha", "Alpha", None, ""),
        ]);
        assert_eq!(
            store.list_all_slugs("en").unwrap(),
            vec![parse_slug("zeta"), parse_slug("alpha")]
        );
        assert_eq!(store.list_all_slugs("fr").unwrap(), vec![parse_slug("alpha")]);
        assert!(store.list_all_slugs("es").unwrap().is_empty());
    }

    #[test]
    fn memory_store_replace_keeps_position() {
        let mut store = MemoryStore::from_documents(vec![
            doc("en", "a", "A", None, ""),
            doc("en", "b", "B", None, ""),
        ]);
        store.insert(doc("en", "a", "A2", None, ""));
        assert_eq!(store.len(), 2);
        assert_eq!(store.list_all_slugs("en").unwrap()[0], parse_slug("a"));
        let a = store.get_document(&parse_slug("a"), "en").unwrap().unwrap();
        assert_eq!(a.title, "A2");
    }

    #[test]
    fn memory_store_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.get_document(&parse_slug("x"), "en").unwrap().is_none());
    }

    // =========================================================================
    // FsStore
    // =========================================================================

    #[test]
    fn fs_store_reads_front_matter() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "en/gameplay/overview.md",
            "---\ntitle: Gameplay Overview\ndescription: The basics\n---\nBody text\n",
        );
        let store = FsStore::new(tmp.path());
        let doc = store
            .get_document(&parse_slug("gameplay/overview"), "en")
            .unwrap()
            .unwrap();
        assert_eq!(doc.title, "Gameplay Overview");
        assert_eq!(doc.description.as_deref(), Some("The basics"));
        assert_eq!(doc.body, "Body text\n");
        assert_eq!(doc.locale, "en");
    }

    #[test]
    fn fs_store_title_falls_back_to_heading_then_slug() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/with-heading.md", "```\n# not this\n```\n\n# Real Title\n");
        write(tmp.path(), "en/getting-started.md", "No heading here.");
        let store = FsStore::new(tmp.path());

        let with_heading = store
            .get_document(&parse_slug("with-heading"), "en")
            .unwrap()
            .unwrap();
        assert_eq!(with_heading.title, "Real Title");

        let bare = store
            .get_document(&parse_slug("getting-started"), "en")
            .unwrap()
            .unwrap();
        assert_eq!(bare.title, "Getting started");
        assert_eq!(bare.description, None);
    }

    #[test]
    fn fs_store_index_file_maps_to_directory_slug() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/plugins/index.md", "# Plugins\n");
        write(tmp.path(), "en/plugins/events.mdx", "# Events\n");
        let store = FsStore::new(tmp.path());

        assert_eq!(
            store.list_all_slugs("en").unwrap(),
            vec![parse_slug("plugins/events"), parse_slug("plugins")]
        );
        let plugins = store
            .get_document(&parse_slug("plugins"), "en")
            .unwrap()
            .unwrap();
        assert_eq!(plugins.title, "Plugins");
    }

    #[test]
    fn fs_store_md_wins_over_mdx_and_index() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/page.md", "# From md\n");
        write(tmp.path(), "en/page.mdx", "# From mdx\n");
        write(tmp.path(), "en/page/index.md", "# From index\n");
        let store = FsStore::new(tmp.path());

        let page = store.get_document(&parse_slug("page"), "en").unwrap().unwrap();
        assert_eq!(page.title, "From md");
        assert_eq!(store.list_all_slugs("en").unwrap(), vec![parse_slug("page")]);
    }

    #[test]
    fn fs_store_skips_hidden_and_partial_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/visible.md", "# Visible\n");
        write(tmp.path(), "en/.draft.md", "# Draft\n");
        write(tmp.path(), "en/_partials/snippet.md", "# Snippet\n");
        write(tmp.path(), "en/notes.txt", "not a doc");
        let store = FsStore::new(tmp.path());

        assert_eq!(store.list_all_slugs("en").unwrap(), vec![parse_slug("visible")]);
    }

    #[test]
    fn fs_store_rejects_escaping_segments() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "secret.md", "# Secret\n");
        write(tmp.path(), "en/ok.md", "# Ok\n");
        let store = FsStore::new(tmp.path());

        let escape = vec!["..".to_string(), "secret".to_string()];
        assert!(store.get_document(&escape, "en").unwrap().is_none());
        assert!(store.get_document(&parse_slug("ok"), "..").unwrap().is_none());
    }

    #[test]
    fn fs_store_does_not_serve_unlisted_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/_drafts/wip.md", "# Work in progress\n");
        write(tmp.path(), "en/_notes.md", "# Notes\n");
        write(tmp.path(), "en/.hidden.md", "# Hidden\n");
        write(tmp.path(), "en/visible.md", "# Visible\n");
        let store = FsStore::new(tmp.path());

        assert_eq!(store.list_all_slugs("en").unwrap(), vec![parse_slug("visible")]);
        for slug in ["_drafts/wip", "_notes", ".hidden"] {
            let found = store.get_document(&parse_slug(slug), "en").unwrap();
            assert!(found.is_none(), "{slug} was served");
        }
    }

    #[test]
    fn fs_store_index_is_not_a_second_slug() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/index.md", "# Home\n");
        write(tmp.path(), "en/plugins/index.md", "# Plugins\n");
        let store = FsStore::new(tmp.path());

        assert_eq!(
            store.list_all_slugs("en").unwrap(),
            vec![Vec::<String>::new(), parse_slug("plugins")]
        );
        assert!(store.get_document(&[], "en").unwrap().is_some());
        assert!(store.get_document(&parse_slug("plugins"), "en").unwrap().is_some());
        assert!(store.get_document(&parse_slug("index"), "en").unwrap().is_none());
        let aliased = store.get_document(&parse_slug("plugins/index"), "en").unwrap();
        assert!(aliased.is_none());
    }

    #[test]
    fn fs_store_every_servable_slug_is_listed() {
        let tmp = TempDir::new().unwrap();
        for rel in [
            "en/intro.md",
            "en/plugins/index.md",
            "en/plugins/events.mdx",
            "en/_drafts/wip.md",
            "en/_partials/snippet.mdx",
            "en/.cache/page.md",
        ] {
            write(tmp.path(), rel, "# Page\n");
        }
        let store = FsStore::new(tmp.path());
        let listed = store.list_all_slugs("en").unwrap();

        for slug in [
            "intro",
            "plugins",
            "plugins/index",
            "plugins/events",
            "_drafts/wip",
            "_partials/snippet",
            ".cache/page",
        ] {
            let slug = parse_slug(slug);
            let served = store.get_document(&slug, "en").unwrap().is_some();
            assert_eq!(served, listed.contains(&slug), "{slug:?}");
        }
    }

    #[test]
    fn fs_store_missing_locale_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());
        assert!(store.list_all_slugs("de").unwrap().is_empty());
        assert!(store.get_document(&parse_slug("intro"), "de").unwrap().is_none());
    }

    #[test]
    fn fs_store_bad_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/broken.md", "---\ntitle: [oops\n---\n");
        let store = FsStore::new(tmp.path());
        let err = store
            .get_document(&parse_slug("broken"), "en")
            .unwrap_err();
        assert!(matches!(err, StoreError::FrontMatter { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn load_all_skips_broken_documents() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "en/a.md", "# A\n");
        write(tmp.path(), "en/b.md", "---\ntitle: [oops\n---\n");
        write(tmp.path(), "en/c.md", "# C\n");
        let store = FsStore::new(tmp.path());

        let docs = load_all(&store, "en").unwrap();
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn fixture_content_lists_every_english_page() {
        let tmp = setup_fixtures();
        let store = FsStore::new(tmp.path().join("content"));
        let slugs = store.list_all_slugs("en").unwrap();
        assert!(slugs.contains(&parse_slug("block/basics")));
        assert!(slugs.contains(&parse_slug("plugins/events")));
        assert!(slugs.contains(&parse_slug("intro")));
    }
}
