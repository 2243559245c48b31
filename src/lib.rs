//! # docnav
//!
//! Navigation, breadcrumbs, verification badges and full-text search for a
//! multi-locale Markdown documentation site. The sidebar tree is the data
//! source: one hand-authored `sidebar.toml` decides display order, reading
//! order and which pages carry editorial flags.
//!
//! # Architecture
//!
//! Everything derives from two inputs loaded once at startup:
//!
//! ```text
//! sidebar.toml  →  Sidebar (immutable tree)
//!                    ├── navigation   prev/next by pre-order flattening
//!                    ├── breadcrumb   ancestor path by depth-first search
//!                    └── verification flags + events-section membership
//!
//! content/<locale>/**/*.md  →  DocumentStore
//!                    └── search       tiered title/description/body ranking
//! ```
//!
//! [`site::Site`] assembles both with the config and the message catalogs
//! and answers per-page questions in localized, prefixed form.
//! [`generate`] writes the static artifacts (search indexes, reading order,
//! `llms.txt`, sitemap) for hosts that do not run docnav.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sidebar`] | Sidebar tree types and `sidebar.toml` loading |
//! | [`navigation`] | Reading order and previous/next resolution |
//! | [`breadcrumb`] | Root-to-page ancestor paths |
//! | [`verification`] | Verified / non-functional / event-page flags of an href |
//! | [`search`] | Search index, ranking, and the hot-swappable [`search::IndexHandle`] |
//! | [`store`] | Document sources: filesystem and in-memory |
//! | [`frontmatter`] | YAML front matter splitting and parsing |
//! | [`text`] | Markdown to plain text, heading anchors, snippets |
//! | [`i18n`] | Message catalogs and locale-prefixed paths |
//! | [`site`] | The assembled site: page contexts, search, consistency check |
//! | [`llms`] | `llms.txt`, `llms-full.txt` and the JSON document listing |
//! | [`sitemap`] | `sitemap.xml` |
//! | [`generate`] | Static artifact output |
//! | [`config`] | `config.toml` loading over stock defaults |
//! | [`types`] | Documents, slugs and hrefs |
//! | [`naming`] | Title fallbacks from slug segments |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Sidebar Is the Reading Order
//!
//! Previous/next links follow the sidebar exactly as authored. There is no
//! separate ordering file and no per-page `order` field: moving a node in
//! `sidebar.toml` moves it everywhere at once. Group nodes without an href
//! are transparent, so the reading order crosses group boundaries.
//!
//! ## Keys, Not Titles
//!
//! Sidebar nodes carry translation keys. One tree serves every locale and
//! titles come from `messages/<locale>.json`, falling back to the default
//! locale and finally to the key itself.
//!
//! ## Snapshot Search Indexes
//!
//! Each locale's index is immutable once built. Readers take an `Arc`
//! snapshot; a rebuild swaps in a new index without blocking searches that
//! are already running, and skips the swap when the content fingerprint is
//! unchanged.

pub mod breadcrumb;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod i18n;
pub mod llms;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod search;
pub mod sidebar;
pub mod site;
pub mod sitemap;
pub mod store;
pub mod text;
pub mod types;
pub mod verification;

#[cfg(test)]
pub(crate) mod test_helpers;
