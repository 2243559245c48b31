//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Sidebar nodes lead
//! with their positional index and translation key, documents with their
//! title; hrefs and flags follow as secondary context. The same sidebar node
//! looks the same in `check`, `nav` and `breadcrumb` output.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sidebar
//! 001 introduction → /docs/intro [verified]
//! 002 plugins → /docs/plugins [developer]
//!     001 eventsReference → /docs/plugins/events [events]
//!         001 playerChatEvent → /docs/plugins/events/player-chat-event [verified]
//!
//! Summary
//!     16 sidebar nodes, 12 navigable entries, 13 documents
//!
//! Orphan documents
//!     /docs/servers/hosting
//! ```
//!
//! ## Nav
//!
//! ```text
//! /docs/block/basics
//!     Previous: Combat → /docs/gameplay/combat
//!     Next: Item Basics → /docs/item/basics
//! ```
//!
//! ## Search
//!
//! ```text
//! Block (1)
//!     001 Block Basics → /docs/block/basics
//!         Placing and breaking blocks.
//! Item (1)
//!     002 Item Basics → /docs/item/basics
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::generate::GenerateReport;
use crate::i18n::NavLink;
use crate::search::CategoryGroup;
use crate::sidebar::{Sidebar, SidebarNode};
use crate::site::{BreadcrumbLink, CheckReport, DocPage, LocalizedNavigation};
use crate::verification::VerificationStatus;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// `[verified]`, `[non-functional]`, `[events]` and audience markers,
/// space-prefixed.
fn node_markers(node: &SidebarNode) -> String {
    let mut markers = String::new();
    if node.verified {
        markers.push_str(" [verified]");
    }
    if node.non_functional {
        markers.push_str(" [non-functional]");
    }
    if node.events_section {
        markers.push_str(" [events]");
    }
    if let Some(audience) = node.audience {
        markers.push_str(&format!(" [{}]", audience));
    }
    markers
}

/// A sidebar node line: positional index, key, optional href and markers.
///
/// ```text
/// 001 introduction → /docs/intro [verified]
/// 002 playerGuide [player]
/// ```
fn node_line(position: usize, node: &SidebarNode) -> String {
    match &node.href {
        Some(href) => format!(
            "{} {} \u{2192} {}{}",
            format_index(position),
            node.key,
            href,
            node_markers(node)
        ),
        None => format!(
            "{} {}{}",
            format_index(position),
            node.key,
            node_markers(node)
        ),
    }
}

fn format_tree(nodes: &[SidebarNode], depth: usize, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        lines.push(format!("{}{}", indent(depth), node_line(i + 1, node)));
        format_tree(&node.children, depth + 1, lines);
    }
}

/// Print formatted lines to stdout.
fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the sidebar tree followed by the consistency report.
pub fn format_check_output(sidebar: &Sidebar, report: &CheckReport) -> Vec<String> {
    let mut lines = vec!["Sidebar".to_string()];
    format_tree(&sidebar.items, 0, &mut lines);

    if !sidebar.redirects.is_empty() {
        lines.push(String::new());
        lines.push("Redirects".to_string());
        for (from, to) in &sidebar.redirects {
            lines.push(format!("    {} \u{2192} {}", from, to));
        }
    }

    lines.push(String::new());
    lines.push("Summary".to_string());
    lines.push(format!(
        "    {} sidebar nodes, {} navigable entries, {} documents",
        report.sidebar_nodes, report.navigable_entries, report.documents
    ));

    if !report.duplicate_hrefs.is_empty() {
        lines.push(String::new());
        lines.push("Duplicate hrefs".to_string());
        for dup in &report.duplicate_hrefs {
            lines.push(format!("    {}: {}", dup.href, dup.keys.join(", ")));
        }
    }

    let sections: [(&str, &[String]); 2] = [
        ("Missing documents", &report.missing_documents),
        ("Orphan documents", &report.orphan_documents),
    ];
    for (title, hrefs) in sections {
        if !hrefs.is_empty() {
            lines.push(String::new());
            lines.push(title.to_string());
            lines.extend(hrefs.iter().map(|href| format!("    {}", href)));
        }
    }

    if !report.dangling_redirects.is_empty() {
        lines.push(String::new());
        lines.push("Dangling redirects".to_string());
        for (from, to) in &report.dangling_redirects {
            lines.push(format!("    {} \u{2192} {}", from, to));
        }
    }

    lines
}

pub fn print_check_output(sidebar: &Sidebar, report: &CheckReport) {
    print_lines(format_check_output(sidebar, report));
}

// ============================================================================
// nav / breadcrumb / status
// ============================================================================

/// Format previous/next links of a page.
pub fn format_navigation(href: &str, nav: &LocalizedNavigation) -> Vec<String> {
    let link = |label: &str, target: &Option<NavLink>| match target {
        Some(l) => format!("    {}: {} \u{2192} {}", label, l.title, l.href),
        None => format!("    {}: (none)", label),
    };
    vec![
        href.to_string(),
        link("Previous", &nav.prev),
        link("Next", &nav.next),
    ]
}

pub fn print_navigation(href: &str, nav: &LocalizedNavigation) {
    print_lines(format_navigation(href, nav));
}

/// Format a breadcrumb trail, one level per line, deepest last.
///
/// ```text
/// 001 Plugins → /docs/plugins
///     002 Events Reference → /docs/plugins/events
///         003 Player Chat Event
/// ```
pub fn format_breadcrumbs(href: &str, crumbs: &[BreadcrumbLink]) -> Vec<String> {
    if crumbs.is_empty() {
        return vec![format!("{} is not in the sidebar", href)];
    }
    crumbs
        .iter()
        .enumerate()
        .map(|(depth, crumb)| match &crumb.href {
            Some(h) => format!(
                "{}{} {} \u{2192} {}",
                indent(depth),
                format_index(depth + 1),
                crumb.label,
                h
            ),
            None => format!("{}{} {}", indent(depth), format_index(depth + 1), crumb.label),
        })
        .collect()
}

pub fn print_breadcrumbs(href: &str, crumbs: &[BreadcrumbLink]) {
    print_lines(format_breadcrumbs(href, crumbs));
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Format the verification flags of an href, plus its redirect target if
/// it is a retired URL.
pub fn format_status(
    href: &str,
    status: &VerificationStatus,
    redirect: Option<&str>,
) -> Vec<String> {
    let mut lines = vec![href.to_string()];
    if let Some(target) = redirect {
        lines.push(format!("    Redirects to: {}", target));
    }
    if !status.found {
        lines.push("    Not in the sidebar".to_string());
        return lines;
    }
    lines.push(format!("    Verified: {}", yes_no(status.verified)));
    lines.push(format!("    Non-functional: {}", yes_no(status.non_functional)));
    lines.push(format!("    Event page: {}", yes_no(status.is_event_page)));
    lines
}

pub fn print_status(href: &str, status: &VerificationStatus, redirect: Option<&str>) {
    print_lines(format_status(href, status, redirect));
}

// ============================================================================
// search
// ============================================================================

/// Format grouped search results. Positions are global ranks, so they keep
/// counting across groups.
pub fn format_search_results(
    query: &str,
    groups: &[CategoryGroup],
    config: &SiteConfig,
) -> Vec<String> {
    if groups.is_empty() {
        return vec![format!("No results for \"{}\"", query)];
    }
    let mut lines = Vec::new();
    let mut rank = 0;
    for group in groups {
        lines.push(format!(
            "{} ({})",
            config.category_name(&group.category),
            group.results.len()
        ));
        for result in &group.results {
            rank += 1;
            lines.push(format!(
                "    {} {} \u{2192} {}",
                format_index(rank),
                result.title,
                result.href
            ));
            if let Some(description) = &result.description {
                lines.push(format!("        {}", truncate_desc(description, 70)));
            }
        }
    }
    lines
}

pub fn print_search_results(query: &str, groups: &[CategoryGroup], config: &SiteConfig) {
    print_lines(format_search_results(query, groups, config));
}

// ============================================================================
// page
// ============================================================================

/// Format the page context a template would receive.
pub fn format_page(page: &DocPage) -> Vec<String> {
    let doc = &page.document;
    let mut lines = vec![doc.title.clone()];
    if let Some(description) = &doc.description {
        lines.push(format!("    {}", truncate_desc(description, 70)));
    }
    lines.push(format!("    URL: {}", page.canonical_url));
    if page.is_fallback() {
        lines.push(format!(
            "    Locale: {} (served from {})",
            page.locale, doc.locale
        ));
    } else {
        lines.push(format!("    Locale: {}", page.locale));
    }
    if let Some(audience) = page.audience {
        lines.push(format!("    Audience: {}", audience));
    }

    let trail: Vec<&str> = page.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
    if !trail.is_empty() {
        lines.push(format!("    Breadcrumbs: {}", trail.join(" \u{203a} ")));
    }
    if let Some(prev) = &page.navigation.prev {
        lines.push(format!("    Previous: {} \u{2192} {}", prev.title, prev.href));
    }
    if let Some(next) = &page.navigation.next {
        lines.push(format!("    Next: {} \u{2192} {}", next.title, next.href));
    }
    if page.verification.non_functional {
        lines.push("    Status: non-functional".to_string());
    } else if page.verification.verified {
        lines.push("    Status: verified".to_string());
    } else if page.shows_untested_warning() {
        lines.push("    Status: untested event".to_string());
    }

    if !page.headings.is_empty() {
        lines.push("    Contents".to_string());
        for heading in &page.headings {
            let depth = if heading.level == 3 { 2 } else { 1 };
            lines.push(format!(
                "    {}{} #{}",
                indent(depth),
                heading.text,
                heading.id
            ));
        }
    }
    lines
}

pub fn print_page(page: &DocPage) {
    print_lines(format_page(page));
}

// ============================================================================
// build
// ============================================================================

/// Format the generate report: per-locale counts, then written files.
pub fn format_generate_output(report: &GenerateReport, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, locale) in report.locales.iter().enumerate() {
        lines.push(format!(
            "{} {} ({} documents, {} nav entries)",
            format_index(i + 1),
            locale.locale,
            locale.documents,
            locale.nav_entries
        ));
    }
    lines.push(String::new());
    lines.push("Files".to_string());
    for file in &report.files {
        lines.push(format!("    {}", file.display()));
    }
    lines.push(String::new());
    lines.push(format!(
        "Generated {} files in {}",
        report.files.len(),
        output_dir.display()
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport, output_dir: &Path) {
    print_lines(format_generate_output(report, output_dir));
}

// ============================================================================
// Tests
// ============================================================================
