//! Frontmatter extraction from content documents.
//!
//! A document may start with a `---` line, followed by a YAML header and a
//! second `---` line. Everything after the closing marker is the body.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

const MARKER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Header must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Ordered key/value header of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderRecord {
    entries: Mapping,
}

impl HeaderRecord {
    pub fn new(entries: Mapping) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Text form of a scalar field, if present
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// Entries in document order. Keys that are not scalars are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Value)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| scalar_text(k).map(|key| (key, v)))
    }

    /// Serialize back to YAML header text
    pub fn to_yaml(&self) -> Result<String, FrontmatterError> {
        if self.entries.is_empty() {
            return Ok(String::new());
        }
        Ok(serde_yaml::to_string(&self.entries)?)
    }
}

/// A document split into its optional header and body
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub header: Option<HeaderRecord>,
    pub body: &'a str,
}

/// Text form of a scalar value. Null is empty; mappings and sequences have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn next_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}

/// Split raw text into (header text, body) when it carries a closed header.
///
/// Returns `None` when the text does not start with a marker line or the
/// marker is never repeated.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let (first, mut rest) = next_line(content);
    if !is_marker(first) {
        return None;
    }

    let header_start = content.len() - rest.len();
    while !rest.is_empty() {
        let line_start = content.len() - rest.len();
        let (line, after) = next_line(rest);
        if is_marker(line) {
            return Some((&content[header_start..line_start], after));
        }
        rest = after;
    }

    None
}

/// Parse header text into a record. An empty header is an empty record.
pub fn parse_header(text: &str) -> Result<HeaderRecord, FrontmatterError> {
    if text.trim().is_empty() {
        return Ok(HeaderRecord::default());
    }

    match serde_yaml::from_str::<Value>(text)? {
        Value::Null => Ok(HeaderRecord::default()),
        Value::Mapping(entries) => Ok(HeaderRecord::new(entries)),
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Tagged(_) => {
            Err(FrontmatterError::NotAMapping("a scalar"))
        }
        Value::Sequence(_) => Err(FrontmatterError::NotAMapping("a sequence")),
    }
}

/// Extract header and body from a document.
///
/// A malformed header is logged and ignored; the whole text is then the
/// body so the reader still sees the content.
///
/// # Example
///
/// ```
/// use trailpost_core::frontmatter::extract;
///
/// let doc = extract("---\ntitle: Summer Camp\n---\n# Packing list\n");
/// let header = doc.header.unwrap();
/// assert_eq!(header.get_text("title").as_deref(), Some("Summer Camp"));
/// assert_eq!(doc.body, "# Packing list\n");
/// ```
pub fn extract(content: &str) -> Document<'_> {
    let Some((header_text, body)) = split_frontmatter(content) else {
        return Document {
            header: None,
            body: content,
        };
    };

    match parse_header(header_text) {
        Ok(header) => Document {
            header: Some(header),
            body,
        },
        Err(e) => {
            tracing::warn!("Ignoring malformed frontmatter: {}", e);
            Document {
                header: None,
                body: content,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Summer Camp
description: A week at Camp Whitsett
hero_image: assets/images/camp.jpg
---

# Packing

Bring a flashlight."#;

        let doc = extract(content);
        let header = doc.header.unwrap();
        assert_eq!(header.get_text("title").as_deref(), Some("Summer Camp"));
        assert_eq!(
            header.get_text("description").as_deref(),
            Some("A week at Camp Whitsett")
        );
        assert_eq!(header.len(), 3);
        assert!(doc.body.contains("# Packing"));
        assert!(doc.body.starts_with('\n'));
    }

    #[test]
    fn test_keys_keep_document_order() {
        let doc = extract("---\nzeta: 1\nalpha: 2\nmid: 3\n---\n");
        let keys: Vec<String> = doc.header.unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_value_kinds() {
        let doc = extract(
            "---\ncount: 12\nactive: true\nnothing: ~\nnested:\n  a: 1\nlist:\n  - x\n---\n",
        );
        let header = doc.header.unwrap();
        assert_eq!(header.get_text("count").as_deref(), Some("12"));
        assert_eq!(header.get_text("active").as_deref(), Some("true"));
        assert_eq!(header.get_text("nothing").as_deref(), Some(""));
        assert_eq!(header.get_text("nested"), None);
        assert_eq!(header.get_text("list"), None);
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let doc = extract(content);
        assert!(doc.header.is_none());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_missing_closing_marker() {
        let content = "---\ntitle: Unclosed\n\nBody text";
        assert!(split_frontmatter(content).is_none());

        let doc = extract(content);
        assert!(doc.header.is_none());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_marker_must_open_the_document() {
        let content = "intro\n---\ntitle: x\n---\nbody";
        assert!(split_frontmatter(content).is_none());
    }

    #[test]
    fn test_marker_must_be_whole_line() {
        let content = "---\ntitle: x\n----\nbody\n";
        assert!(split_frontmatter(content).is_none());
    }

    #[test]
    fn test_crlf_and_trailing_space() {
        let content = "--- \r\ntitle: Windows\r\n---\r\nBody\r\n";
        let doc = extract(content);
        assert_eq!(
            doc.header.unwrap().get_text("title").as_deref(),
            Some("Windows")
        );
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn test_closing_marker_at_end_of_file() {
        let doc = extract("---\ntitle: Header only\n---");
        assert_eq!(
            doc.header.unwrap().get_text("title").as_deref(),
            Some("Header only")
        );
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_empty_header() {
        let doc = extract("---\n---\nBody");
        assert_eq!(doc.header, Some(HeaderRecord::default()));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_invalid_yaml_keeps_whole_text() {
        let content = "---\ntitle: Test\ninvalid yaml: [unclosed\n---\n\nContent.";

        assert!(matches!(
            parse_header(split_frontmatter(content).unwrap().0),
            Err(FrontmatterError::YamlError(_))
        ));

        let doc = extract(content);
        assert!(doc.header.is_none());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_scalar_header_is_malformed() {
        assert!(matches!(
            parse_header("just a string\n"),
            Err(FrontmatterError::NotAMapping(_))
        ));
        assert!(matches!(
            parse_header("- a\n- b\n"),
            Err(FrontmatterError::NotAMapping(_))
        ));
    }

    #[test]
    fn test_header_round_trip() {
        let content = r#"---
title: "Court of Honor: Spring"
order: 3
published: false
story_1: |
  First paragraph.

  Second paragraph.
tags:
  - awards
  - family
meta:
  author: Scribe
---
Body stays put.
"#;

        let first = extract(content);
        let header = first.header.clone().unwrap();

        let rebuilt = format!("---\n{}---\n{}", header.to_yaml().unwrap(), first.body);
        let second = extract(&rebuilt);

        assert_eq!(second.header, first.header);
        assert_eq!(second.body, first.body);
    }
}
