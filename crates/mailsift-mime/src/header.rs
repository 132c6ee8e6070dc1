//! Header block parsing.

use crate::split::unfold_header;
use std::collections::HashMap;
use std::fmt;

/// Ordered collection of header fields.
///
/// Names are stored as written (trimmed) and looked up case-sensitively.
/// A repeated name replaces the earlier value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
    /// Position of each name in `fields`.
    index: HashMap<String, usize>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing any existing value for the same name.
    ///
    /// Empty names are ignored.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        let value = value.into();
        match self.index.get(&name) {
            Some(&pos) => self.fields[pos].1 = value,
            None => {
                self.index.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
            }
        }
    }

    /// Gets the value for a header name, matched exactly.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&pos| self.fields[pos].1.as_str())
    }

    /// Gets the value for a header name, ignoring ASCII case.
    ///
    /// When several names differ only in case, the first one wins.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the value of the first of `names` that is present and non-empty.
    #[must_use]
    pub fn first_non_empty(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|v| !v.is_empty())
    }

    /// Returns the number of distinct fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over all fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parses a header block.
    ///
    /// Folded lines are unfolded first. Each line is split on its first
    /// colon; lines without a colon or with an empty name are skipped.
    /// Names and values are trimmed.
    ///
    /// ```text
    /// Header-Name: value
    /// Folded: first
    ///   continuation
    /// ```
    #[must_use]
    pub fn parse(header_block: &str) -> Self {
        let mut headers = Self::new();
        if header_block.is_empty() {
            return headers;
        }

        let unfolded = unfold_header(header_block);
        for line in unfolded.split(['\r', '\n']) {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            headers.insert(name.trim(), value.trim());
        }

        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.fields {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Headers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect
)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
        assert_eq!(headers.len(), 0);
    }

    #[test]
    fn test_headers_insert_get() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), None); // Case sensitive
        assert_eq!(headers.get_ignore_case("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_headers_last_wins_keeps_position() {
        let mut headers = Headers::new();
        headers.insert("To", "alice@example.com");
        headers.insert("Subject", "Hi");
        headers.insert("To", "bob@example.com");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("To"), Some("bob@example.com"));
        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["To", "Subject"]);
    }

    #[test]
    fn test_headers_parse_large_block() {
        let mut block: String = (0..50_000).map(|i| format!("X-Field-{i}: {i}\n")).collect();
        block.push_str("X-Field-7: replaced");

        let headers = Headers::parse(&block);
        assert_eq!(headers.len(), 50_000);
        assert_eq!(headers.get("X-Field-7"), Some("replaced"));
        assert_eq!(headers.get("X-Field-49999"), Some("49999"));
        assert_eq!(headers.iter().nth(7), Some(("X-Field-7", "replaced")));
    }

    #[test]
    fn test_headers_empty_name_ignored() {
        let mut headers = Headers::new();
        headers.insert("", "orphan");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_parse() {
        let text = concat!(
            "From: sender@example.com\r\n",
            "To: recipient@example.com\r\n",
            "Subject: Test Message\r\n",
            "Content-Type: text/plain;\r\n",
            " charset=utf-8",
        );

        let headers = Headers::parse(text);
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(headers.get("To"), Some("recipient@example.com"));
        assert_eq!(headers.get("Subject"), Some("Test Message"));
        assert_eq!(
            headers.get("Content-Type"),
            Some("text/plain; charset=utf-8")
        );
    }

    #[test]
    fn test_headers_parse_folded_subject() {
        let headers = Headers::parse("Subject: Hello\r\n World");
        assert_eq!(headers.get("Subject"), Some("Hello World"));
    }

    #[test]
    fn test_headers_parse_trims_and_keeps_later_colons() {
        let headers = Headers::parse("  X-Test :   value  \nDate: Mon, 1 Jan 2024 10:00:00 +0000");
        assert_eq!(headers.get("X-Test"), Some("value"));
        assert_eq!(headers.get("Date"), Some("Mon, 1 Jan 2024 10:00:00 +0000"));
    }

    #[test]
    fn test_headers_parse_skips_malformed_lines() {
        let headers = Headers::parse("no colon here\n: empty name\nA: 1\n\nB:");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("A"), Some("1"));
        assert_eq!(headers.get("B"), Some(""));
    }

    #[test]
    fn test_headers_parse_empty() {
        assert!(Headers::parse("").is_empty());
    }

    #[test]
    fn test_headers_first_non_empty() {
        let headers = Headers::parse("Delivered-To:\nTo: b@example.com");
        assert_eq!(
            headers.first_non_empty(&["Delivered-To", "To"]),
            Some("b@example.com")
        );
        assert_eq!(headers.first_non_empty(&["Cc"]), None);
    }

    #[test]
    fn test_headers_display() {
        let headers = Headers::parse("From: a@example.com\nTo: b@example.com");
        assert_eq!(headers.to_string(), "From: a@example.com\nTo: b@example.com\n");
    }
}
