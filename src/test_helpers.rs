//! Shared test utilities for the docnav test suite.
//!
//! Provides fixture setup, the sample sidebar trees, document builders and
//! assertions over breadcrumb paths.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let sidebar = scenario_sidebar();
//! let path = resolve_breadcrumb_path(&sidebar, "/docs/b");
//! assert_ancestor_chain(&sidebar, &path);
//!
//! let tmp = setup_fixtures();
//! let site = Site::open(tmp.path()).unwrap();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::breadcrumb::BreadcrumbItem;
use crate::navigation::FlattenedEntry;
use crate::search::SearchResult;
use crate::sidebar::{Audience, Sidebar, SidebarNode};
use crate::types::{Document, parse_slug};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Sample trees
// =========================================================================

/// The canonical small tree:
///
/// ```text
/// Root
/// ├── A      /docs/a
/// ├── Group
/// │   └── B  /docs/b
/// └── C      /docs/c
/// ```
pub fn scenario_sidebar() -> Sidebar {
    Sidebar::new(vec![SidebarNode::group(
        "Root",
        vec![
            SidebarNode::leaf("A", "/docs/a"),
            SidebarNode::group("Group", vec![SidebarNode::leaf("B", "/docs/b")]),
            SidebarNode::leaf("C", "/docs/c"),
        ],
    )])
}

/// In-memory copy of `fixtures/site/sidebar.toml` (without redirects).
pub fn fixture_like_sidebar() -> Sidebar {
    Sidebar::new(vec![
        SidebarNode::leaf("introduction", "/docs/intro").verified(),
        SidebarNode::group(
            "playerGuide",
            vec![
                SidebarNode::leaf("overview", "/docs/gameplay/overview").verified(),
                SidebarNode::leaf("combat", "/docs/gameplay/combat"),
            ],
        )
        .with_audience(Audience::Player),
        SidebarNode::group(
            "creatorGuide",
            vec![
                SidebarNode::leaf("blockBasics", "/docs/block/basics"),
                SidebarNode::leaf("itemBasics", "/docs/item/basics"),
            ],
        )
        .with_audience(Audience::Creator),
        SidebarNode::group(
            "plugins",
            vec![
                SidebarNode::leaf("gettingStarted", "/docs/plugins/getting-started").verified(),
                SidebarNode::group(
                    "eventsReference",
                    vec![
                        SidebarNode::group(
                            "playerEvents",
                            vec![
                                SidebarNode::leaf(
                                    "playerChatEvent",
                                    "/docs/plugins/events/player-chat-event",
                                )
                                .verified(),
                                SidebarNode::leaf(
                                    "playerMouseButtonEvent",
                                    "/docs/plugins/events/player-mouse-button-event",
                                )
                                .non_functional(),
                            ],
                        ),
                        SidebarNode::leaf("bootEvent", "/docs/plugins/events/boot-event"),
                    ],
                )
                .with_href("/docs/plugins/events")
                .events_section(),
            ],
        )
        .with_href("/docs/plugins")
        .with_audience(Audience::Developer),
        SidebarNode::group(
            "servers",
            vec![SidebarNode::leaf("serverSetup", "/docs/servers/setup")],
        )
        .with_audience(Audience::Admin),
    ])
}

// =========================================================================
// Documents
// =========================================================================

/// Build a document from a slash-separated slug.
pub fn doc(
    locale: &str,
    slug: &str,
    title: &str,
    description: Option<&str>,
    body: &str,
) -> Document {
    Document {
        slug: parse_slug(slug),
        locale: locale.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        body: body.to_string(),
    }
}

/// Two documents in different categories whose titles both contain
/// "Basics".
pub fn basics_documents() -> Vec<Document> {
    vec![
        doc(
            "en",
            "block/basics",
            "Block Basics",
            Some("Placing and breaking blocks."),
            "# Block Basics\n\nBlocks are the building unit of every world.",
        ),
        doc(
            "en",
            "item/basics",
            "Item Basics",
            Some("Holding, dropping and stacking items."),
            "# Item Basics\n\nItems live in your inventory.",
        ),
    ]
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a flattened entry by href. Panics if not found.
pub fn find_entry<'a>(entries: &'a [FlattenedEntry], href: &str) -> &'a FlattenedEntry {
    entries.iter().find(|e| e.href == href).unwrap_or_else(|| {
        let hrefs: Vec<&str> = entries.iter().map(|e| e.href.as_str()).collect();
        panic!("entry '{href}' not found. Available: {hrefs:?}")
    })
}

/// Result hrefs in rank order.
pub fn result_hrefs(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.href.as_str()).collect()
}

// =========================================================================
// Breadcrumb assertions
// =========================================================================

/// Assert that `path` is a real root-to-node chain in `sidebar`: the first
/// item is a top-level node, and every following item is a child of the
/// one before it, with matching keys and hrefs.
pub fn assert_ancestor_chain(sidebar: &Sidebar, path: &[BreadcrumbItem]) {
    let mut level: &[SidebarNode] = &sidebar.items;
    for (depth, item) in path.iter().enumerate() {
        let node = level
            .iter()
            .find(|n| n.key == item.title_key && n.href == item.href)
            .unwrap_or_else(|| {
                let keys: Vec<&str> = level.iter().map(|n| n.key.as_str()).collect();
                panic!(
                    "breadcrumb item '{}' at depth {depth} is not a child of the previous \
                     item. Available: {keys:?}",
                    item.title_key
                )
            });
        level = &node.children;
    }
}
