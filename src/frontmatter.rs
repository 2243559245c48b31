//! YAML front matter at the top of content files.
//!
//! ```text
//! ---
//! title: Player Chat Event
//! description: Fired when a player sends a chat message.
//! ---
//! # Player Chat Event
//! ...
//! ```
//!
//! Only `title` and `description` are read; other keys are ignored so
//! content authored for other tools still loads.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Split a file into its YAML block (without delimiters) and body.
///
/// Returns `(None, content)` when the file does not open with a `---` line
/// or the block is never closed.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = strip_delimiter_line(content) else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, content)
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
}

/// Parse the front matter and return it with the remaining body.
///
/// A file without front matter yields the default (all `None`).
pub fn parse(content: &str) -> Result<(FrontMatter, &str), serde_yaml::Error> {
    match split(content) {
        (Some(yaml), body) if !yaml.trim().is_empty() => {
            let front: FrontMatter = serde_yaml::from_str(yaml)?;
            Ok((front, body))
        }
        (_, body) => Ok((FrontMatter::default(), body)),
    }
}
