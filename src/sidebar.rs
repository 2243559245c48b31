//! The sidebar tree: the site's static, ordered taxonomy of documents.
//!
//! The tree is authored once in `sidebar.toml` and never mutated after
//! loading. Child order is meaningful: it is both the display order and the
//! previous/next reading order computed by [`navigation`](crate::navigation).
//!
//! ## File Format
//!
//! ```toml
//! [[items]]
//! key = "introduction"
//! href = "/docs/intro"
//!
//! [[items]]
//! key = "plugins"
//! audience = "developer"
//!
//!   [[items.items]]
//!   key = "eventsReference"
//!   href = "/docs/plugins/events"
//!   events_section = true
//!
//!     [[items.items.items]]
//!     key = "playerChatEvent"
//!     href = "/docs/plugins/events/player-chat-event"
//!     verified = true
//!
//! [redirects]
//! "/docs/old-path" = "/docs/new-path"
//! ```
//!
//! Node keys are translation keys, never display text: the same tree serves
//! every locale, titles are looked up through [`i18n`](crate::i18n).
//!
//! ## Duplicate hrefs
//!
//! An href should appear at most once. Every resolver tolerates duplicates
//! deterministically (the first node in pre-order wins), so duplicates are
//! reported by [`Sidebar::duplicate_hrefs`] rather than rejected.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidebarError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Sidebar parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Sidebar node has an empty key (under '{0}')")]
    EmptyKey(String),
    #[error("Sidebar node '{key}' has href '{href}' that does not start with '/'")]
    RelativeHref { key: String, href: String },
}

/// Who a sidebar section is written for. Rendered as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Player,
    Creator,
    Developer,
    Admin,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Player => "player",
            Audience::Creator => "creator",
            Audience::Developer => "developer",
            Audience::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorial flags authored by hand against specific pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeFlags {
    /// The page was checked against the real behavior.
    pub verified: bool,
    /// The page documents something that exists but does not work.
    pub non_functional: bool,
}

/// One node of the sidebar tree.
///
/// A node with an href and no children is a plain leaf. A node with
/// children may also carry its own href (a navigable group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarNode {
    /// Translation key; unique among siblings.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, rename = "items", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SidebarNode>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub non_functional: bool,
    /// Marks the root of the events reference; every page below it is an
    /// event page for verification purposes.
    #[serde(default)]
    pub events_section: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
}

impl SidebarNode {
    /// A leaf pointing at `href`.
    pub fn leaf(key: &str, href: &str) -> Self {
        Self {
            key: key.to_string(),
            href: Some(href.to_string()),
            children: Vec::new(),
            verified: false,
            non_functional: false,
            events_section: false,
            audience: None,
        }
    }

    /// A group without its own href.
    pub fn group(key: &str, children: Vec<SidebarNode>) -> Self {
        Self {
            key: key.to_string(),
            href: None,
            children,
            verified: false,
            non_functional: false,
            events_section: false,
            audience: None,
        }
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    pub fn non_functional(mut self) -> Self {
        self.non_functional = true;
        self
    }

    pub fn events_section(mut self) -> Self {
        self.events_section = true;
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = Some(audience);
        self
    }

    pub fn flags(&self) -> NodeFlags {
        NodeFlags {
            verified: self.verified,
            non_functional: self.non_functional,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An href that appears on more than one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateHref {
    pub href: String,
    /// Title keys of every node carrying the href, in pre-order.
    pub keys: Vec<String>,
}

/// The full sidebar: top-level nodes plus the redirect table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sidebar {
    #[serde(default)]
    pub items: Vec<SidebarNode>,
    /// Old href → new href. Not followed transitively.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub redirects: BTreeMap<String, String>,
}

impl Sidebar {
    pub fn new(items: Vec<SidebarNode>) -> Self {
        Self {
            items,
            redirects: BTreeMap::new(),
        }
    }

    /// Parse and validate a sidebar from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SidebarError> {
        let sidebar: Sidebar = toml::from_str(content)?;
        sidebar.validate()?;
        Ok(sidebar)
    }

    /// Load and validate `sidebar.toml`. Duplicate hrefs are logged, not
    /// rejected.
    pub fn load(path: &Path) -> Result<Self, SidebarError> {
        let content = fs::read_to_string(path).map_err(|source| SidebarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sidebar = Self::from_toml_str(&content)?;
        for dup in sidebar.duplicate_hrefs() {
            tracing::warn!(
                href = %dup.href,
                keys = ?dup.keys,
                "duplicate sidebar href; the first node wins"
            );
        }
        tracing::debug!(
            path = %path.display(),
            nodes = sidebar.node_count(),
            "loaded sidebar"
        );
        Ok(sidebar)
    }

    /// Structural checks: non-empty keys, absolute hrefs.
    pub fn validate(&self) -> Result<(), SidebarError> {
        fn check(nodes: &[SidebarNode], parent: &str) -> Result<(), SidebarError> {
            for node in nodes {
                if node.key.trim().is_empty() {
                    return Err(SidebarError::EmptyKey(parent.to_string()));
                }
                if let Some(href) = &node.href
                    && !href.starts_with('/')
                {
                    return Err(SidebarError::RelativeHref {
                        key: node.key.clone(),
                        href: href.clone(),
                    });
                }
                check(&node.children, &node.key)?;
            }
            Ok(())
        }
        check(&self.items, "<root>")
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[SidebarNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.items)
    }

    /// Every href carried by more than one node, in order of first
    /// appearance.
    pub fn duplicate_hrefs(&self) -> Vec<DuplicateHref> {
        fn collect<'a>(
            nodes: &'a [SidebarNode],
            order: &mut Vec<&'a str>,
            seen: &mut HashMap<&'a str, Vec<String>>,
        ) {
            for node in nodes {
                if let Some(href) = node.href.as_deref() {
                    let keys = seen.entry(href).or_default();
                    if keys.is_empty() {
                        order.push(href);
                    }
                    keys.push(node.key.clone());
                }
                collect(&node.children, order, seen);
            }
        }

        let mut order = Vec::new();
        let mut seen = HashMap::new();
        collect(&self.items, &mut order, &mut seen);

        order
            .into_iter()
            .filter_map(|href| {
                let keys = seen.remove(href)?;
                (keys.len() > 1).then(|| DuplicateHref {
                    href: href.to_string(),
                    keys,
                })
            })
            .collect()
    }

    /// First node (pre-order) whose href equals `href`.
    pub fn find(&self, href: &str) -> Option<&SidebarNode> {
        fn search<'a>(nodes: &'a [SidebarNode], href: &str) -> Option<&'a SidebarNode> {
            for node in nodes {
                if node.href.as_deref() == Some(href) {
                    return Some(node);
                }
                if let Some(found) = search(&node.children, href) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.items, href)
    }

    /// Audience of the page at `href`: the node's own, else the nearest
    /// ancestor's. Resolved against the same node [`Sidebar::find`] returns.
    pub fn audience_for(&self, href: &str) -> Option<Audience> {
        fn search(
            nodes: &[SidebarNode],
            href: &str,
            inherited: Option<Audience>,
        ) -> Option<Option<Audience>> {
            for node in nodes {
                let audience = node.audience.or(inherited);
                if node.href.as_deref() == Some(href) {
                    return Some(audience);
                }
                if let Some(found) = search(&node.children, href, audience) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.items, href, None).flatten()
    }

    /// Redirect target for a retired href, if any.
    pub fn redirect_for(&self, href: &str) -> Option<&str> {
        let trimmed = if href.len() > 1 {
            href.trim_end_matches('/')
        } else {
            href
        };
        self.redirects.get(trimmed).map(String::as_str)
    }
}
