//! `sitemap.xml` generation.
//!
//! Lists the home page, the configured static pages and every document of
//! every locale, each under its locale-prefixed URL (as-needed: the default
//! locale has no prefix). Entries are deduplicated by URL, first occurrence
//! wins.
//!
//! The XML is rendered with [maud](https://maud.lambda.xyz/), which escapes
//! every interpolated value.

use crate::config::SiteConfig;
use crate::i18n::localized_path;
use crate::types::slug_href;
use maud::{PreEscaped, html};
use std::collections::HashSet;

pub const SITEMAP_PATH: &str = "sitemap.xml";

const HOME_PRIORITY: f32 = 1.0;
const STATIC_PRIORITY: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: String,
    pub priority: f32,
}

/// Collect sitemap entries.
///
/// `slugs_by_locale` pairs each locale with its document slugs, in the
/// order they should be listed.
pub fn entries(
    config: &SiteConfig,
    slugs_by_locale: &[(String, Vec<Vec<String>>)],
) -> Vec<SitemapEntry> {
    let origin = config.origin();
    let i18n = &config.i18n;
    let mut all = Vec::new();

    for locale in &i18n.locales {
        let path = localized_path(locale, "/", i18n);
        all.push(SitemapEntry {
            loc: if path == "/" {
                origin.to_string()
            } else {
                format!("{}{}", origin, path)
            },
            changefreq: "daily".to_string(),
            priority: HOME_PRIORITY,
        });
    }

    for page in &config.sitemap.static_pages {
        for locale in &i18n.locales {
            all.push(SitemapEntry {
                loc: format!("{}{}", origin, localized_path(locale, page, i18n)),
                changefreq: "weekly".to_string(),
                priority: STATIC_PRIORITY,
            });
        }
    }

    for (locale, slugs) in slugs_by_locale {
        for slug in slugs {
            let href = slug_href(&config.docs.base_path, slug);
            all.push(SitemapEntry {
                loc: format!("{}{}", origin, localized_path(locale, &href, i18n)),
                changefreq: config.sitemap.changefreq.clone(),
                priority: config.sitemap.priority,
            });
        }
    }

    let mut seen = HashSet::new();
    all.retain(|entry| seen.insert(entry.loc.clone()));
    all
}

/// Render entries as a `urlset` document.
pub fn render(entries: &[SitemapEntry]) -> String {
    let markup = html! {
        (PreEscaped("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"))
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for entry in entries {
                url {
                    loc { (entry.loc) }
                    changefreq { (entry.changefreq) }
                    priority { (format!("{:.1}", entry.priority)) }
                }
            }
        }
    };
    markup.into_string()
}
