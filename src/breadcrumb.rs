//! Root-to-page breadcrumb paths through the sidebar tree.

use crate::sidebar::{Sidebar, SidebarNode};
use serde::Serialize;

/// One step of a breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub title_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Find the path from the top of the tree to the first node (pre-order)
/// whose href equals `href`, inclusive of that node.
///
/// Returns an empty path when no node matches. The last item keeps its
/// href; callers rendering a "current page" marker drop it themselves.
pub fn resolve_breadcrumb_path(sidebar: &Sidebar, href: &str) -> Vec<BreadcrumbItem> {
    let mut path = Vec::new();
    if search(&sidebar.items, href, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn search(nodes: &[SidebarNode], href: &str, path: &mut Vec<BreadcrumbItem>) -> bool {
    for node in nodes {
        path.push(BreadcrumbItem {
            title_key: node.key.clone(),
            href: node.href.clone(),
        });
        if node.href.as_deref() == Some(href) || search(&node.children, href, path) {
            return true;
        }
        path.pop();
    }
    false
}
