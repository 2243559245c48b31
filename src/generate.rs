//! Static artifact generation.
//!
//! Writes everything a static host needs to serve search, navigation and
//! the machine-readable listings without running docnav.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── search/
//! │   ├── en.json          # Search index entries per locale
//! │   └── fr.json
//! ├── nav/
//! │   ├── en.json          # Reading order with translated titles and prev/next
//! │   └── fr.json
//! ├── api/
//! │   └── llms.json        # Default-locale document listing
//! ├── llms.txt
//! ├── llms-full.txt
//! └── sitemap.xml
//! ```
//!
//! Output is deterministic: the same site produces byte-identical files.

use crate::i18n::localized_path;
use crate::llms;
use crate::search::{SearchIndex, SearchOptions};
use crate::sidebar::Audience;
use crate::site::{Site, SiteError};
use crate::sitemap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Site(#[from] SiteError),
}

/// One entry of `nav/<locale>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavRecord {
    pub href: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
}

/// Per-locale counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: String,
    pub documents: usize,
    pub nav_entries: usize,
}

/// What [`generate`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub locales: Vec<LocaleReport>,
    /// Written files, relative to the output directory.
    pub files: Vec<PathBuf>,
}

/// Generate every artifact of `site` into `output_dir`.
pub fn generate(site: &Site, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let config = site.config();
    let mut report = GenerateReport::default();
    let mut slugs_by_locale = Vec::new();

    fs::create_dir_all(output_dir)?;

    for locale in &config.i18n.locales {
        let documents = site.documents(locale)?;
        let index = SearchIndex::build_with(
            &documents,
            &config.docs.base_path,
            SearchOptions::from(&config.search),
        );
        let entries: Vec<_> = index.entries().collect();
        write_json(output_dir, &format!("search/{}.json", locale), &entries, &mut report)?;

        let nav = nav_records(site, locale);
        write_json(output_dir, &format!("nav/{}.json", locale), &nav, &mut report)?;

        tracing::info!(locale = %locale, documents = documents.len(), "generated locale artifacts");
        report.locales.push(LocaleReport {
            locale: locale.clone(),
            documents: documents.len(),
            nav_entries: nav.len(),
        });
        slugs_by_locale.push((
            locale.clone(),
            documents.into_iter().map(|d| d.slug).collect::<Vec<_>>(),
        ));
    }

    let default_docs = site.documents(&config.i18n.default_locale)?;
    write_text(
        output_dir,
        llms::INDEX_PATH,
        &llms::index_text(config, &default_docs),
        &mut report,
    )?;
    write_text(
        output_dir,
        llms::FULL_PATH,
        &llms::full_text(config, &default_docs),
        &mut report,
    )?;
    write_json(
        output_dir,
        llms::API_PATH,
        &llms::doc_list(config, &default_docs, None),
        &mut report,
    )?;

    let entries = sitemap::entries(config, &slugs_by_locale);
    write_text(
        output_dir,
        sitemap::SITEMAP_PATH,
        &sitemap::render(&entries),
        &mut report,
    )?;

    tracing::info!(
        output = %output_dir.display(),
        files = report.files.len(),
        "generated site artifacts"
    );
    Ok(report)
}

/// Reading order of the site as seen from one locale.
pub fn nav_records(site: &Site, locale: &str) -> Vec<NavRecord> {
    let order = site.reading_order();
    let i18n = &site.config().i18n;
    let localize = |href: &str| localized_path(locale, href, i18n);

    order
        .entries()
        .iter()
        .filter(|entry| order.position(&entry.href) == Some(entry.index))
        .map(|entry| {
            let nav = order.resolve(&entry.href);
            NavRecord {
                href: localize(&entry.href),
                title: site.translator().sidebar_title(locale, &entry.title_key),
                prev: nav.prev.map(|p| localize(&p.href)),
                next: nav.next.map(|n| localize(&n.href)),
                audience: site.sidebar().audience_for(&entry.href),
            }
        })
        .collect()
}

fn write_json<T: Serialize + ?Sized>(
    output_dir: &Path,
    rel: &str,
    value: &T,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_text(output_dir, rel, &json, report)
}

fn write_text(
    output_dir: &Path,
    rel: &str,
    content: &str,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    report.files.push(PathBuf::from(rel));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::i18n::Translator;
    use crate::sidebar::{Sidebar, SidebarNode};
    use crate::store::MemoryStore;
    use crate::test_helpers::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn small_site() -> Site {
        let mut config = SiteConfig::default();
        config.i18n.locales = vec!["en".to_string(), "fr".to_string()];
        let translator = Translator::new("en")
            .with_catalog("en", json!({"sidebar": {"A": "Alpha", "B": "Beta", "C": "Gamma"}}))
            .with_catalog("fr", json!({"sidebar": {"B": "Bêta"}}));
        let store = MemoryStore::from_documents(vec![
            doc("en", "a", "A", Some("First page"), "Alpha body"),
            doc("en", "b", "B", None, "Beta body"),
            doc("en", "c", "C", None, "Gamma body"),
            doc("fr", "b", "B (fr)", None, "Corps bêta"),
        ]);
        Site::from_parts(config, scenario_sidebar(), translator, store)
    }

    #[test]
    fn writes_every_artifact() {
        let tmp = TempDir::new().unwrap();
        let report = generate(&small_site(), tmp.path()).unwrap();

        let files: Vec<String> = report
            .files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            files,
            vec![
                "search/en.json",
                "nav/en.json",
                "search/fr.json",
                "nav/fr.json",
                "llms.txt",
                "llms-full.txt",
                "api/llms.json",
                "sitemap.xml",
            ]
        );
        for file in &report.files {
            assert!(tmp.path().join(file).is_file(), "{} missing", file.display());
        }
        assert_eq!(
            report.locales,
            vec![
                LocaleReport {
                    locale: "en".to_string(),
                    documents: 3,
                    nav_entries: 3,
                },
                LocaleReport {
                    locale: "fr".to_string(),
                    documents: 1,
                    nav_entries: 3,
                },
            ]
        );
    }

    #[test]
    fn nav_json_is_localized() {
        let tmp = TempDir::new().unwrap();
        generate(&small_site(), tmp.path()).unwrap();
        let nav: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("nav/fr.json")).unwrap())
                .unwrap();
        assert_eq!(nav[1]["href"], "/fr/docs/b");
        assert_eq!(nav[1]["title"], "Bêta");
        assert_eq!(nav[1]["prev"], "/fr/docs/a");
        assert_eq!(nav[1]["next"], "/fr/docs/c");
        assert_eq!(nav[0]["title"], "Alpha");
        assert!(nav[0].get("prev").is_none());
    }

    #[test]
    fn nav_records_skip_duplicate_hrefs() {
        let sidebar = Sidebar::new(vec![
            SidebarNode::leaf("A", "/docs/a"),
            SidebarNode::leaf("A2", "/docs/a"),
            SidebarNode::leaf("B", "/docs/b"),
        ]);
        let site = Site::from_parts(
            SiteConfig::default(),
            sidebar,
            Translator::new("en"),
            MemoryStore::new(),
        );
        let records = nav_records(&site, "en");
        let hrefs: Vec<&str> = records.iter().map(|r| r.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/docs/a", "/docs/b"]);
        assert_eq!(records[1].prev.as_deref(), Some("/docs/a"));
    }

    #[test]
    fn nav_records_carry_section_audience() {
        let sidebar = Sidebar::new(vec![
            SidebarNode::leaf("A", "/docs/a"),
            SidebarNode::group("Admins", vec![SidebarNode::leaf("B", "/docs/b")])
                .with_audience(Audience::Admin),
        ]);
        let site = Site::from_parts(
            SiteConfig::default(),
            sidebar,
            Translator::new("en"),
            MemoryStore::new(),
        );
        let records = nav_records(&site, "fr");
        assert_eq!(records[0].audience, None);
        assert_eq!(records[1].audience, Some(Audience::Admin));

        let json = serde_json::to_value(&records).unwrap();
        assert!(json[0].get("audience").is_none());
        assert_eq!(json[1]["audience"], "admin");
    }

    #[test]
    fn search_json_lists_locale_documents() {
        let tmp = TempDir::new().unwrap();
        generate(&small_site(), tmp.path()).unwrap();
        let entries: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("search/en.json")).unwrap())
                .unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["href"], "/docs/a");
        assert_eq!(entries[0]["category"], "a");
        assert_eq!(entries[0]["description"], "First page");
    }

    #[test]
    fn output_is_deterministic() {
        let site = small_site();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let report = generate(&site, first.path()).unwrap();
        generate(&site, second.path()).unwrap();
        for file in &report.files {
            assert_eq!(
                fs::read(first.path().join(file)).unwrap(),
                fs::read(second.path().join(file)).unwrap(),
                "{} differs",
                file.display()
            );
        }
    }
}
