//! Display names derived from slug segments.
//!
//! Slugs are lowercase, dash-separated path segments (`getting-started`,
//! `player-connect-event`). When nothing better is available (no front
//! matter title, no configured category label) they are turned into display
//! text here, uniformly for every caller:
//!
//! - `modding` → "Modding" (category label)
//! - `getting-started` → "Getting started" (document title fallback)

/// Uppercase the first character, leaving the rest untouched.
///
/// - `"modding"` → `"Modding"`
/// - `"getting-started"` → `"Getting-started"`
/// - `""` → `""`
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn a slug segment into a title: dashes become spaces, first letter
/// uppercased.
///
/// - `"getting-started"` → `"Getting started"`
/// - `"faq"` → `"Faq"`
/// - `"update-3"` → `"Update 3"`
pub fn humanize(segment: &str) -> String {
    capitalize(&segment.replace(['-', '_'], " "))
}
