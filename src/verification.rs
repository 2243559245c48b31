//! Per-page verification flags.
//!
//! Flags are editorial metadata written into `sidebar.toml` by hand, so
//! resolution is a pure lookup. The one derived bit is whether the page sits
//! inside the events reference: the subtree rooted at a node marked
//! `events_section = true`. Pages there that are not verified get an
//! "untested" warning from the page template.

use crate::sidebar::{Sidebar, SidebarNode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerificationStatus {
    pub verified: bool,
    pub non_functional: bool,
    /// The page is the events section root or below it.
    pub is_event_page: bool,
    /// A sidebar node carries this href.
    pub found: bool,
}

/// Look up the flags of the first node (pre-order) whose href is `href`.
///
/// Never fails: an unknown href yields the all-false status.
pub fn resolve_verification_status(sidebar: &Sidebar, href: &str) -> VerificationStatus {
    search(&sidebar.items, href, false).unwrap_or_default()
}

fn search(nodes: &[SidebarNode], href: &str, in_events: bool) -> Option<VerificationStatus> {
    for node in nodes {
        let in_events = in_events || node.events_section;
        if node.href.as_deref() == Some(href) {
            let flags = node.flags();
            return Some(VerificationStatus {
                verified: flags.verified,
                non_functional: flags.non_functional,
                is_event_page: in_events,
                found: true,
            });
        }
        if let Some(status) = search(&node.children, href, in_events) {
            return Some(status);
        }
    }
    None
}
