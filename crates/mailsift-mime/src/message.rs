//! MIME message structure.

use crate::content_type::ContentType;
use crate::error::{DecodeError, Result};
use crate::extract::{extract_emails, extract_ips};
use crate::header::Headers;
use std::fmt;

/// Transfer encodings the decoder acts on.
///
/// Matching is exact: `BASE64` or `Base64` is not recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TransferEncoding {
    /// No decoding (absent, 7bit, 8bit, binary or unrecognized).
    #[default]
    Identity,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Parses a `Content-Transfer-Encoding` header value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            _ => Self::Identity,
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
        }
    }
}

/// One MIME entity: the whole message or a multipart child.
///
/// A parsed entity has either `content` or a non-empty `parts`, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Message {
    /// Header fields.
    pub headers: Headers,
    /// Body as it appeared in the input, trimmed.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub raw_body: String,
    /// Decoded body of a leaf entity.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub content: Option<String>,
    /// `--` plus the `Content-Type` boundary parameter.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub boundary_marker: Option<String>,
    /// Child entities in boundary order.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub parts: Vec<Message>,
    /// Addresses from `Delivered-To`, else `To`.
    pub to: Vec<String>,
    /// Addresses from `Return-Path`, else `From`.
    pub from: Vec<String>,
    /// `Subject` value, empty if absent.
    pub subject: String,
    /// IPv4 addresses from `X-Originating-IP`.
    pub originating_ip: Vec<String>,
    /// Transfer encoding applied to the body.
    pub transfer_encoding: TransferEncoding,
    /// Why the body could not be decoded, if it could not.
    #[cfg_attr(
        feature = "serde",
        serde(
            skip_serializing_if = "Option::is_none",
            serialize_with = "serialize_decode_error"
        )
    )]
    pub decode_error: Option<DecodeError>,
}

impl Message {
    /// Creates an entity from its headers and raw body, deriving the
    /// summary fields. The body is not decoded yet.
    #[must_use]
    pub fn new(headers: Headers, raw_body: impl Into<String>) -> Self {
        let to = headers
            .first_non_empty(&["Delivered-To", "To"])
            .map(extract_emails)
            .unwrap_or_default();
        let from = headers
            .first_non_empty(&["Return-Path", "From"])
            .map(extract_emails)
            .unwrap_or_default();
        let subject = headers.get("Subject").unwrap_or_default().to_string();
        let originating_ip = headers
            .get_ignore_case("x-originating-ip")
            .map(extract_ips)
            .unwrap_or_default();
        let boundary_marker = headers
            .get("Content-Type")
            .and_then(|ct| ContentType::parse(ct).boundary_marker());
        let transfer_encoding = headers
            .get("Content-Transfer-Encoding")
            .map_or(TransferEncoding::Identity, TransferEncoding::parse);

        Self {
            headers,
            raw_body: raw_body.into(),
            content: None,
            boundary_marker,
            parts: Vec::new(),
            to,
            from,
            subject,
            originating_ip,
            transfer_encoding,
            decode_error: None,
        }
    }

    /// Gets the parsed `Content-Type`, if the header is present.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        self.headers.get("Content-Type").map(ContentType::parse)
    }

    /// Checks if this entity was split into parts.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Checks if this entity carries content directly.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.content.is_some()
    }

    /// Gets the leaf content, or an empty string for multipart entities.
    #[must_use]
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Gets the first recipient address.
    #[must_use]
    pub fn first_to(&self) -> Option<&str> {
        self.to.first().map(String::as_str)
    }

    /// Gets the first sender address.
    #[must_use]
    pub fn first_from(&self) -> Option<&str> {
        self.from.first().map(String::as_str)
    }

    /// Iterates over this entity and all descendants, depth first.
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.parts.iter().rev());
            Some(next)
        })
    }

    /// Iterates over leaf entities in document order.
    pub fn leaves(&self) -> impl Iterator<Item = &Self> {
        self.walk().filter(|m| m.is_leaf())
    }

    /// Collects every decode failure in the tree.
    #[must_use]
    pub fn decode_errors(&self) -> Vec<&DecodeError> {
        self.walk().filter_map(|m| m.decode_error.as_ref()).collect()
    }

    /// Fails if any entity in the tree could not be decoded.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] in document order.
    pub fn ensure_decoded(&self) -> Result<()> {
        match self.decode_errors().first() {
            Some(&err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }
}

#[cfg(feature = "serde")]
#[allow(clippy::ref_option)] // signature required by serialize_with
fn serialize_decode_error<S: serde::Serializer>(
    error: &Option<DecodeError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.collect_str(err),
        None => serializer.serialize_none(),
    }
}
