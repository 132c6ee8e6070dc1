//! Header/body and multipart boundary splitting.
//!
//! All functions accept CR, LF and CRLF line endings, including mixtures
//! within one message.

/// Returns the length of the line break starting at `pos`, if any.
fn line_break_at(bytes: &[u8], pos: usize) -> Option<usize> {
    match bytes.get(pos)? {
        b'\r' if bytes.get(pos + 1) == Some(&b'\n') => Some(2),
        b'\r' | b'\n' => Some(1),
        _ => None,
    }
}

/// Finds the first blank line: a line break directly followed by another.
fn find_blank_line(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    while pos < bytes.len() {
        if let Some(len) = line_break_at(bytes, pos) {
            if line_break_at(bytes, pos + len).is_some() {
                return Some(pos);
            }
            pos += len;
        } else {
            pos += 1;
        }
    }
    None
}

/// Splits a raw message into its header block and body block.
///
/// Both halves are trimmed. Without a blank line separator the whole input
/// is the header block and the body is empty.
#[must_use]
pub fn split_message(raw: &str) -> (&str, &str) {
    find_blank_line(raw.as_bytes()).map_or_else(
        || (raw.trim(), ""),
        |pos| (raw[..pos].trim(), raw[pos..].trim()),
    )
}

/// Splits a multipart fragment into its header block and body block.
///
/// Unlike [`split_message`], a line break at the very start marks an empty
/// header section, which RFC 2046 allows for body parts.
#[must_use]
pub fn split_entity(fragment: &str) -> (&str, &str) {
    match line_break_at(fragment.as_bytes(), 0) {
        Some(len) => ("", fragment[len..].trim()),
        None => split_message(fragment),
    }
}

/// Unfolds header continuation lines (RFC 5322 §2.2.3).
///
/// Every line break followed by spaces or tabs becomes a single space.
#[must_use]
pub fn unfold_header(header_block: &str) -> String {
    let bytes = header_block.as_bytes();
    let mut result = String::with_capacity(header_block.len());
    let mut copied = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(len) = line_break_at(bytes, pos) else {
            pos += 1;
            continue;
        };
        let ws = bytes[pos + len..]
            .iter()
            .take_while(|b| matches!(b, b' ' | b'\t'))
            .count();
        if ws > 0 {
            result.push_str(&header_block[copied..pos]);
            result.push(' ');
            copied = pos + len + ws;
        }
        pos += len + ws;
    }

    result.push_str(&header_block[copied..]);
    result
}

/// Returns the byte offsets of every non-overlapping occurrence of `needle`.
///
/// An empty needle has no occurrences.
#[must_use]
pub fn find_indices(needle: &str, haystack: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack.match_indices(needle).map(|(i, _)| i).collect()
}

/// Iterator over the fragments between consecutive boundary markers.
///
/// Text before the first marker (preamble) and after the last (epilogue) is
/// never yielded. Fragments are produced lazily so callers can stop early.
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    body: &'a str,
    marker: &'a str,
    /// Offset just past the previous marker, `None` once exhausted.
    start: Option<usize>,
    entities: bool,
}

impl<'a> Fragments<'a> {
    /// Creates an iterator yielding trimmed fragments.
    #[must_use]
    pub fn new(marker: &'a str, body: &'a str) -> Self {
        let start = if marker.is_empty() {
            None
        } else {
            body.find(marker).map(|i| i + marker.len())
        };
        Self {
            body,
            marker,
            start,
            entities: false,
        }
    }

    /// Creates an iterator yielding fragments ready to be parsed as MIME
    /// entities.
    ///
    /// Only the remainder of the delimiter line is stripped from the front,
    /// so a part without headers keeps the blank line that introduces its
    /// body. Trailing whitespace is trimmed.
    #[must_use]
    pub fn entities(marker: &'a str, body: &'a str) -> Self {
        Self {
            entities: true,
            ..Self::new(marker, body)
        }
    }
}

fn strip_delimiter_line(fragment: &str) -> &str {
    let rest = fragment.trim_start_matches([' ', '\t']);
    let rest = line_break_at(rest.as_bytes(), 0).map_or(rest, |len| &rest[len..]);
    rest.trim_end()
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.start?;
        let Some(len) = self.body[start..].find(self.marker) else {
            self.start = None;
            return None;
        };
        let end = start + len;
        self.start = Some(end + self.marker.len());
        let fragment = &self.body[start..end];
        Some(if self.entities {
            strip_delimiter_line(fragment)
        } else {
            fragment.trim()
        })
    }
}

/// Splits a multipart body on `boundary_marker`.
///
/// Returns an empty list when the marker occurs fewer than two times.
#[must_use]
pub fn split_multipart<'a>(boundary_marker: &'a str, body: &'a str) -> Vec<&'a str> {
    Fragments::new(boundary_marker, body).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_message_crlf() {
        assert_eq!(split_message("A: 1\r\n\r\nbody text"), ("A: 1", "body text"));
    }

    #[test]
    fn test_split_message_mixed_line_endings() {
        assert_eq!(split_message("A: 1\nB: 2\n\nbody"), ("A: 1\nB: 2", "body"));
        assert_eq!(split_message("A: 1\r\rbody"), ("A: 1", "body"));
        assert_eq!(split_message("A: 1\r\n\nbody"), ("A: 1", "body"));
        assert_eq!(split_message("A: 1\n\r\nbody"), ("A: 1", "body"));
    }

    #[test]
    fn test_split_message_single_crlf_is_not_blank() {
        let (header, body) = split_message("A: 1\r\nB: 2\r\n");
        assert_eq!(header, "A: 1\r\nB: 2");
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_message_no_separator() {
        assert_eq!(split_message("A: 1\r\nB: 2"), ("A: 1\r\nB: 2", ""));
        assert_eq!(split_message(""), ("", ""));
    }

    #[test]
    fn test_split_message_keeps_later_blank_lines_in_body() {
        let (_, body) = split_message("A: 1\r\n\r\nfirst\r\n\r\nsecond\r\n");
        assert_eq!(body, "first\r\n\r\nsecond");
    }

    #[test]
    fn test_split_message_leading_line_break() {
        assert_eq!(split_message("\nA: 1"), ("A: 1", ""));
        assert_eq!(
            split_message("\r\nFrom: a@example.com\r\n\r\nhello"),
            ("From: a@example.com", "hello")
        );
    }

    #[test]
    fn test_split_entity_empty_header_section() {
        assert_eq!(split_entity("\r\nbody only\r\n"), ("", "body only"));
        assert_eq!(split_entity("\nbody only"), ("", "body only"));
        assert_eq!(split_entity("A: 1\r\n\r\nbody"), ("A: 1", "body"));
        assert_eq!(split_entity("A: 1"), ("A: 1", ""));
    }

    #[test]
    fn test_unfold_header() {
        assert_eq!(
            unfold_header("Subject: Hello\r\n World"),
            "Subject: Hello World"
        );
        assert_eq!(
            unfold_header("Subject: a\n\t\tb\r\n  c\r\nTo: x"),
            "Subject: a b c\r\nTo: x"
        );
    }

    #[test]
    fn test_unfold_leaves_plain_breaks() {
        assert_eq!(unfold_header("A: 1\r\nB: 2"), "A: 1\r\nB: 2");
        assert_eq!(unfold_header("A: 1\rB: 2"), "A: 1\rB: 2");
    }

    #[test]
    fn test_find_indices() {
        assert_eq!(find_indices("--", "--a--b----"), vec![0, 3, 6, 8]);
        assert!(find_indices("", "abc").is_empty());
        assert!(find_indices("x", "abc").is_empty());
    }

    #[test]
    fn test_split_multipart() {
        assert_eq!(
            split_multipart("--XYZ", "--XYZpart-A--XYZpart-B--XYZ"),
            vec!["part-A", "part-B"]
        );
    }

    #[test]
    fn test_split_multipart_drops_preamble_and_epilogue() {
        let body = "preamble\r\n--b\r\nContent-Type: text/plain\r\n\r\none\r\n--b\r\n\r\ntwo\r\n--b--\r\nepilogue";
        let parts = split_multipart("--b", body);
        assert_eq!(parts, vec!["Content-Type: text/plain\r\n\r\none", "two"]);
    }

    #[test]
    fn test_split_multipart_too_few_markers() {
        assert!(split_multipart("--XYZ", "no markers").is_empty());
        assert!(split_multipart("--XYZ", "--XYZ only one").is_empty());
        assert!(split_multipart("", "anything").is_empty());
    }

    #[test]
    fn test_fragments_stop_early() {
        let mut fragments = Fragments::new("|", "|a|b|c|");
        assert_eq!(fragments.next(), Some("a"));
        assert_eq!(fragments.next(), Some("b"));
        assert_eq!(fragments.next(), Some("c"));
        assert_eq!(fragments.next(), None);
        assert_eq!(fragments.next(), None);
    }

    #[test]
    fn test_entity_fragments_keep_empty_header_section() {
        let body = "--b  \r\nA: 1\r\n\r\none\r\n--b\r\n\r\ntwo\r\n--b--";
        let parts: Vec<_> = Fragments::entities("--b", body).collect();
        assert_eq!(parts, vec!["A: 1\r\n\r\none", "\r\ntwo"]);
        assert_eq!(split_entity(parts[1]), ("", "two"));
    }
}
