//! Machine-readable documentation listings for language models.
//!
//! Three artifacts describe the default-locale documentation set:
//!
//! - `llms.txt`: a Markdown index of every page grouped by category
//! - `llms-full.txt`: every page's raw Markdown in one file
//! - `api/llms.json`: the same listing as JSON ([`DocList`]), with
//!   single-document lookups ([`DocDetail`]) for embedders serving it live
//!
//! ## `llms.txt` Format
//!
//! ```text
//! # Documentation
//!
//! > One-line site summary.
//!
//! ## Documentation Pages
//!
//! ### Gameplay
//!
//! - [Gameplay Overview](https://example.com/docs/gameplay/overview): How the world works.
//!
//! ## Additional Resources
//!
//! - Full documentation with content: https://example.com/llms-full.txt
//! - JSON API: https://example.com/api/llms.json
//! - Sitemap: https://example.com/sitemap.xml
//! ```
//!
//! Categories appear in order of their first document; category labels come
//! from `[categories]` in `config.toml`, else the capitalized slug segment.

use crate::config::SiteConfig;
use crate::types::Document;
use serde::Serialize;

/// Paths of the generated artifacts, relative to the output root.
pub const INDEX_PATH: &str = "llms.txt";
pub const FULL_PATH: &str = "llms-full.txt";
pub const API_PATH: &str = "api/llms.json";

fn doc_url(config: &SiteConfig, doc: &Document) -> String {
    format!("{}{}", config.origin(), doc.href(&config.docs.base_path))
}

/// Render `llms.txt`.
pub fn index_text(config: &SiteConfig, documents: &[Document]) -> String {
    let mut lines = vec![format!("# {}", config.site_title), String::new()];
    if !config.site_summary.is_empty() {
        lines.push(format!("> {}", config.site_summary));
        lines.push(String::new());
    }
    lines.push("## Documentation Pages".to_string());
    lines.push(String::new());

    for (category, docs) in by_category(documents) {
        lines.push(format!("### {}", config.category_name(category)));
        lines.push(String::new());
        for doc in docs {
            let mut line = format!("- [{}]({})", doc.title, doc_url(config, doc));
            if let Some(description) = &doc.description {
                line.push_str(": ");
                line.push_str(description);
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    let origin = config.origin();
    lines.push("## Additional Resources".to_string());
    lines.push(String::new());
    lines.push(format!("- Full documentation with content: {}/{}", origin, FULL_PATH));
    lines.push(format!("- JSON API: {}/{}", origin, API_PATH));
    lines.push(format!("- Sitemap: {}/sitemap.xml", origin));
    lines.push(String::new());
    lines.join("\n")
}

/// Render `llms-full.txt`: a header, then every document separated by
/// `---` rules.
pub fn full_text(config: &SiteConfig, documents: &[Document]) -> String {
    let mut out = format!(
        "# {} - Complete Documentation\n\nTotal Documents: {}\nBase URL: {}\n\n---\n\n",
        config.site_title,
        documents.len(),
        config.origin()
    );
    for doc in documents {
        out.push_str(&format!("## {}\n\n", doc.title));
        out.push_str(&format!("**URL:** {}\n", doc_url(config, doc)));
        out.push_str(&format!("**Path:** {}\n", doc.href(&config.docs.base_path)));
        if let Some(description) = &doc.description {
            out.push_str(&format!("**Description:** {}\n", description));
        }
        out.push('\n');
        out.push_str(doc.body.trim());
        out.push_str("\n\n---\n\n");
    }
    out
}

/// Documents grouped by category, categories in first-appearance order.
fn by_category(documents: &[Document]) -> Vec<(&str, Vec<&Document>)> {
    let mut groups: Vec<(&str, Vec<&Document>)> = Vec::new();
    for doc in documents {
        let category = doc.category();
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, docs)) => docs.push(doc),
            None => groups.push((category, vec![doc])),
        }
    }
    groups
}

/// One document in the JSON listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocListItem {
    /// Slug joined with `/`.
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub path: Vec<String>,
}

impl DocListItem {
    pub fn new(config: &SiteConfig, doc: &Document) -> Self {
        Self {
            slug: doc.slug_path(),
            url: doc_url(config, doc),
            title: doc.title.clone(),
            description: doc.description.clone(),
            category: doc.category().to_string(),
            path: doc.slug.clone(),
        }
    }
}

/// `{"total": n, "baseUrl": "...", "docs": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocList {
    pub total: usize,
    pub base_url: String,
    pub docs: Vec<DocListItem>,
}

/// List documents, optionally only those of one category.
pub fn doc_list(config: &SiteConfig, documents: &[Document], category: Option<&str>) -> DocList {
    let docs: Vec<DocListItem> = documents
        .iter()
        .filter(|doc| category.is_none_or(|c| doc.category() == c))
        .map(|doc| DocListItem::new(config, doc))
        .collect();
    DocList {
        total: docs.len(),
        base_url: config.origin().to_string(),
        docs,
    }
}

/// A listing item plus the raw Markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocDetailItem {
    #[serde(flatten)]
    pub item: DocListItem,
    /// Raw body, or empty when content was not requested.
    pub content: String,
}

/// `{"doc": {...}}`, or `{"doc": null, "error": "Document not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocDetail {
    pub doc: Option<DocDetailItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocDetail {
    pub fn is_found(&self) -> bool {
        self.doc.is_some()
    }
}

/// Detail response for one looked-up document.
pub fn doc_detail(config: &SiteConfig, doc: Option<&Document>, include_content: bool) -> DocDetail {
    match doc {
        Some(doc) => DocDetail {
            doc: Some(DocDetailItem {
                item: DocListItem::new(config, doc),
                content: if include_content {
                    doc.body.clone()
                } else {
                    String::new()
                },
            }),
            error: None,
        },
        None => DocDetail {
            doc: None,
            error: Some("Document not found".to_string()),
        },
    }
}
