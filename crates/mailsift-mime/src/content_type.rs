//! `Content-Type` interpretation.

use std::fmt;

/// How a body is dispatched, decided by the main type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// `text/*`.
    Text,
    /// `multipart/*`.
    Multipart,
    /// Any other main type, decoded like text.
    Other,
}

/// MIME content type as far as the decoder needs it.
///
/// Parsing never fails: missing pieces are left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type, lowercased (e.g., "text", "multipart").
    pub main_type: String,
    /// Subtype, lowercased (e.g., "plain", "mixed").
    pub sub_type: String,
    /// Boundary parameter without quotes.
    pub boundary: Option<String>,
    /// Charset parameter without quotes.
    pub charset: Option<String>,
}

impl ContentType {
    /// Parses a `Content-Type` header value.
    ///
    /// Format: `type/subtype; param1=value1; param2="value2"`
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let essence = value.split(';').next().unwrap_or_default();
        let (main_type, sub_type) = essence.split_once('/').unwrap_or((essence, ""));

        Self {
            main_type: main_type.trim().to_ascii_lowercase(),
            sub_type: sub_type.trim().to_ascii_lowercase(),
            boundary: parameter(value, "boundary"),
            charset: parameter(value, "charset"),
        }
    }

    /// Returns the dispatch kind for this type.
    #[must_use]
    pub fn kind(&self) -> MediaKind {
        match self.main_type.as_str() {
            "text" => MediaKind::Text,
            "multipart" => MediaKind::Multipart,
            _ => MediaKind::Other,
        }
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.kind() == MediaKind::Multipart
    }

    /// Returns the literal delimiter that separates parts: the boundary
    /// prefixed with `--`.
    #[must_use]
    pub fn boundary_marker(&self) -> Option<String> {
        self.boundary.as_ref().map(|b| format!("--{b}"))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;
        if let Some(charset) = &self.charset {
            write!(f, "; charset={charset}")?;
        }
        if let Some(boundary) = &self.boundary {
            write!(f, "; boundary=\"{boundary}\"")?;
        }
        Ok(())
    }
}

/// Extracts `name=value` from a header value.
///
/// The value runs up to the next `;`, is trimmed, and loses its surrounding
/// quotes. The name is matched without regard to ASCII case.
fn parameter(value: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=");
    let start = value.to_ascii_lowercase().find(&needle)? + needle.len();
    let rest = &value[start..];
    let end = rest.find(';').unwrap_or(rest.len());
    let param = rest[..end].trim().trim_matches('"').trim();
    (!param.is_empty()).then(|| param.to_string())
}
