//! Previous/next reading order derived from the sidebar tree.
//!
//! The tree is flattened by a pre-order walk: a node comes before its
//! children, and its children come before its following siblings. Every
//! node with an href becomes an entry, whatever its depth. Nodes without an
//! href are transparent: they are not entries, but their children are still
//! visited.
//!
//! ```text
//! Root
//! ├── A        (/a)          flattened: [A, B, C]
//! ├── Group    (no href)
//! │   └── B    (/b)          B: prev = A, next = C
//! └── C        (/c)
//! ```
//!
//! The position in this flattened sequence is the only ordering contract for
//! previous/next. A document that is not in the sidebar has neither; that is
//! a normal outcome, not an error.

use crate::sidebar::{Sidebar, SidebarNode};
use crate::types::slug_href;
use serde::Serialize;
use std::collections::HashMap;

/// A navigable sidebar node in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlattenedEntry {
    pub href: String,
    /// Translation key of the node; resolved to a title per locale.
    pub title_key: String,
    /// Position in the flattened sequence.
    pub index: usize,
}

/// Neighbours of the current page in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub prev: Option<FlattenedEntry>,
    pub next: Option<FlattenedEntry>,
}

/// Flatten the tree into reading order.
///
/// Deterministic: the same tree always yields the same sequence.
pub fn flatten(sidebar: &Sidebar) -> Vec<FlattenedEntry> {
    fn walk(nodes: &[SidebarNode], out: &mut Vec<FlattenedEntry>) {
        for node in nodes {
            if let Some(href) = &node.href {
                out.push(FlattenedEntry {
                    href: href.clone(),
                    title_key: node.key.clone(),
                    index: out.len(),
                });
            }
            walk(&node.children, out);
        }
    }

    let mut entries = Vec::new();
    walk(&sidebar.items, &mut entries);
    entries
}

/// Resolve previous/next for the document at `current_slug`.
///
/// The document's href is `base_path` joined with the slug. With duplicate
/// hrefs the first occurrence in reading order is used.
pub fn resolve_navigation(
    sidebar: &Sidebar,
    base_path: &str,
    current_slug: &[String],
) -> Navigation {
    let entries = flatten(sidebar);
    let href = slug_href(base_path, current_slug);
    match entries.iter().position(|e| e.href == href) {
        Some(i) => neighbours(&entries, i),
        None => Navigation::default(),
    }
}

fn neighbours(entries: &[FlattenedEntry], i: usize) -> Navigation {
    Navigation {
        prev: i.checked_sub(1).map(|p| entries[p].clone()),
        next: entries.get(i + 1).cloned(),
    }
}

/// Flattened order computed once for repeated lookups.
///
/// Equivalent to calling [`resolve_navigation`] per request, without
/// re-walking the tree.
#[derive(Debug, Clone, Default)]
pub struct NavigationOrder {
    entries: Vec<FlattenedEntry>,
    /// href → index of its first occurrence.
    positions: HashMap<String, usize>,
}

impl NavigationOrder {
    pub fn new(sidebar: &Sidebar) -> Self {
        let entries = flatten(sidebar);
        let mut positions = HashMap::with_capacity(entries.len());
        for entry in &entries {
            positions.entry(entry.href.clone()).or_insert(entry.index);
        }
        Self { entries, positions }
    }

    pub fn entries(&self) -> &[FlattenedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the first entry with this href.
    pub fn position(&self, href: &str) -> Option<usize> {
        self.positions.get(href).copied()
    }

    /// Previous/next for an href.
    pub fn resolve(&self, href: &str) -> Navigation {
        match self.position(href) {
            Some(i) => neighbours(&self.entries, i),
            None => Navigation::default(),
        }
    }
}
