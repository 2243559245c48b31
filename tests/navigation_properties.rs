//! Properties of navigation, breadcrumbs and verification over the fixture
//! sidebar, exercised through the public API only.

mod common;

use common::{READING_ORDER, setup_site};
use docnav::breadcrumb::resolve_breadcrumb_path;
use docnav::navigation::{Navigation, NavigationOrder, flatten, resolve_navigation};
use docnav::sidebar::{Audience, Sidebar, SidebarNode};
use docnav::types::href_to_slug;
use docnav::verification::{VerificationStatus, resolve_verification_status};

fn fixture_sidebar() -> Sidebar {
    let tmp = setup_site();
    Sidebar::load(&tmp.path().join("sidebar.toml")).unwrap()
}

fn nav_at(sidebar: &Sidebar, href: &str) -> Navigation {
    resolve_navigation(sidebar, "/docs", &href_to_slug("/docs", href).unwrap())
}

#[test]
fn flattened_order_matches_authored_tree() {
    let sidebar = fixture_sidebar();
    let entries = flatten(&sidebar);
    let hrefs: Vec<&str> = entries.iter().map(|e| e.href.as_str()).collect();
    assert_eq!(hrefs, READING_ORDER);
    assert_eq!(sidebar.node_count(), 16);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.index, i);
    }
}

#[test]
fn prev_and_next_are_symmetric() {
    let sidebar = fixture_sidebar();
    for pair in READING_ORDER.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let next_of_a = nav_at(&sidebar, a).next.unwrap();
        let prev_of_b = nav_at(&sidebar, b).prev.unwrap();
        assert_eq!(next_of_a.href, b);
        assert_eq!(prev_of_b.href, a);
    }
}

#[test]
fn ends_of_the_reading_order() {
    let sidebar = fixture_sidebar();
    assert!(nav_at(&sidebar, READING_ORDER[0]).prev.is_none());
    let last_href = READING_ORDER[READING_ORDER.len() - 1];
    assert!(nav_at(&sidebar, last_href).next.is_none());
}

#[test]
fn unknown_page_has_no_neighbours() {
    let nav = nav_at(&fixture_sidebar(), "/docs/servers/hosting");
    assert!(nav.prev.is_none());
    assert!(nav.next.is_none());
}

#[test]
fn precomputed_order_agrees_with_per_call_resolution() {
    let sidebar = fixture_sidebar();
    let order = NavigationOrder::new(&sidebar);
    for href in READING_ORDER {
        let slug = href_to_slug("/docs", href).unwrap();
        assert_eq!(order.resolve(href), resolve_navigation(&sidebar, "/docs", &slug));
    }
}

#[test]
fn breadcrumb_ends_at_the_requested_node() {
    let sidebar = fixture_sidebar();
    for href in READING_ORDER {
        let path = resolve_breadcrumb_path(&sidebar, href);
        assert_eq!(path.last().unwrap().href.as_deref(), Some(*href));
    }
}

#[test]
fn breadcrumb_is_a_real_ancestor_chain() {
    let sidebar = fixture_sidebar();
    for href in READING_ORDER {
        let path = resolve_breadcrumb_path(&sidebar, href);
        let mut level: &[SidebarNode] = &sidebar.items;
        for item in &path {
            let node = level
                .iter()
                .find(|n| n.key == item.title_key)
                .unwrap_or_else(|| {
                    panic!("{} is not a child along the path to {href}", item.title_key)
                });
            assert_eq!(node.href, item.href);
            level = &node.children;
        }
    }
}

#[test]
fn breadcrumb_through_href_less_group() {
    let sidebar = fixture_sidebar();
    let path = resolve_breadcrumb_path(&sidebar, "/docs/plugins/events/player-chat-event");
    let keys: Vec<&str> = path.iter().map(|b| b.title_key.as_str()).collect();
    assert_eq!(keys, vec!["plugins", "eventsReference", "playerEvents", "playerChatEvent"]);
    assert_eq!(path[2].href, None);
}

#[test]
fn breadcrumb_for_unknown_href_is_empty() {
    assert!(resolve_breadcrumb_path(&fixture_sidebar(), "/docs/servers/hosting").is_empty());
}

#[test]
fn every_navigable_href_has_a_status() {
    let sidebar = fixture_sidebar();
    for href in READING_ORDER {
        let status = resolve_verification_status(&sidebar, href);
        assert!(status.found, "{href} not found");
        assert!(!(status.verified && status.non_functional));
    }
}

#[test]
fn event_pages_are_the_events_subtree() {
    let sidebar = fixture_sidebar();
    for href in READING_ORDER {
        let status = resolve_verification_status(&sidebar, href);
        assert_eq!(
            status.is_event_page,
            href.starts_with("/docs/plugins/events"),
            "{href}"
        );
    }
}

#[test]
fn authored_flags_are_reported() {
    let sidebar = fixture_sidebar();
    let chat = resolve_verification_status(&sidebar, "/docs/plugins/events/player-chat-event");
    assert!(chat.verified);
    let mouse =
        resolve_verification_status(&sidebar, "/docs/plugins/events/player-mouse-button-event");
    assert!(mouse.non_functional);
    assert!(!mouse.verified);
    let boot = resolve_verification_status(&sidebar, "/docs/plugins/events/boot-event");
    assert!(!boot.verified && !boot.non_functional && boot.is_event_page);
    let unknown = resolve_verification_status(&sidebar, "/docs/nope");
    assert_eq!(unknown, VerificationStatus::default());
}

#[test]
fn every_navigable_page_inherits_its_section_audience() {
    let sidebar = fixture_sidebar();
    for href in READING_ORDER {
        let expected = match *href {
            "/docs/intro" => None,
            h if h.starts_with("/docs/gameplay") => Some(Audience::Player),
            h if h.starts_with("/docs/block") || h.starts_with("/docs/item") => {
                Some(Audience::Creator)
            }
            h if h.starts_with("/docs/plugins") => Some(Audience::Developer),
            h if h.starts_with("/docs/servers") => Some(Audience::Admin),
            other => panic!("unexpected href {other}"),
        };
        assert_eq!(sidebar.audience_for(href), expected, "{href}");
    }
}

#[test]
fn redirects_are_loaded() {
    let sidebar = fixture_sidebar();
    assert_eq!(sidebar.redirect_for("/docs/events"), Some("/docs/plugins/events"));
    assert_eq!(sidebar.redirect_for("/docs/getting-started"), Some("/docs/intro"));
    assert!(sidebar.duplicate_hrefs().is_empty());
}
