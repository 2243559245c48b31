//! Plain-text views of Markdown bodies.
//!
//! Markdown is parsed with `pulldown-cmark` but never rendered: the site
//! template owns rendering. What this module produces is what search and the
//! table of contents need:
//!
//! - [`plain_text`]: readable text with markup removed, for result snippets
//! - [`extract_headings`]: `h2`/`h3` headings with anchor ids matching the
//!   ids the renderer assigns
//! - [`excerpt`]: a bounded window of text around a search hit
//! - [`fold_case`]: the case folding search matches under

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashMap;

/// Strip Markdown markup, keeping text and inline code.
///
/// Raw HTML (and MDX components) is dropped. Whitespace is collapsed to
/// single spaces.
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell
                | TagEnd::BlockQuote(_),
            ) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// 2 or 3.
    pub level: u8,
    pub text: String,
    /// Anchor id, unique within the document.
    pub id: String,
}

/// Collect `h2` and `h3` headings in document order.
///
/// Ids are assigned to every heading level, so an `h1` or `h4` still
/// consumes its id and later duplicates get the same suffix the renderer
/// gives them.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut slugger = Slugger::default();
    let mut headings = Vec::new();
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level, String::new()));
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&t);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim().to_string();
                    let id = slugger.slug(&text);
                    let level = match level {
                        HeadingLevel::H2 => 2,
                        HeadingLevel::H3 => 3,
                        _ => continue,
                    };
                    headings.push(Heading { level, text, id });
                }
            }
            _ => {}
        }
    }
    headings
}

/// GitHub-style anchor ids: lowercase, punctuation dropped, spaces to
/// dashes, repeats suffixed `-1`, `-2`, ...
#[derive(Debug, Default)]
struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    fn slug(&mut self, text: &str) -> String {
        let base: String = text
            .to_lowercase()
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('-'),
                '-' | '_' => Some(c),
                c if c.is_alphanumeric() => Some(c),
                _ => None,
            })
            .collect();

        let mut candidate = base.clone();
        while let Some(count) = self.seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}-{}", base, count);
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// A window of at most `max_chars` characters of `text` around the first
/// case-insensitive occurrence of `needle`.
///
/// Falls back to the start of the text when the needle is absent. Cut
/// ends are marked with `...`.
pub fn excerpt(text: &str, needle: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if max_chars == 0 || chars.is_empty() {
        return String::new();
    }
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let start = match find_folded(&chars, needle) {
        Some(hit) => hit
            .saturating_sub(max_chars / 4)
            .min(chars.len() - max_chars),
        None => 0,
    };
    let end = start + max_chars;

    let window: String = chars[start..end].iter().collect();
    let mut snippet = String::with_capacity(window.len() + 6);
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(window.trim());
    if end < chars.len() {
        snippet.push_str("...");
    }
    snippet
}

/// Lowercase `s` one character at a time.
///
/// Unlike `str::to_lowercase`, the mapping of each character ignores its
/// neighbours, so folding a substring always yields a substring of the
/// folded whole. Both sigmas fold to `σ`.
pub fn fold_case(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// Char index of the first case-folded occurrence of `needle`.
fn find_folded(haystack: &[char], needle: &str) -> Option<usize> {
    let needle: Vec<char> = needle.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let folded: Vec<char> = haystack.iter().copied().map(fold).collect();
    folded
        .windows(needle.len())
        .position(|w| w == needle.as_slice())
}

fn fold(c: char) -> char {
    match c.to_lowercase().next().unwrap_or(c) {
        'ς' => 'σ',
        c => c,
    }
}
