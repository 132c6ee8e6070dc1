//! Body decoding and multipart recursion.

use crate::config::ParserConfig;
use crate::content_type::{ContentType, MediaKind};
use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{DecodeError, Error, Result};
use crate::header::Headers;
use crate::message::{Message, TransferEncoding};
use crate::split::{Fragments, split_entity, split_message};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

/// Result of decoding one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedBody {
    /// Leaf content.
    Leaf {
        /// Decoded, trimmed text. Holds the undecoded body if `error` is set.
        content: String,
        /// Transfer-encoding failure, if any.
        error: Option<DecodeError>,
    },
    /// Child entities of a multipart body.
    Parts(Vec<Message>),
}

/// Decodes bodies and builds child entities, enforcing the configured limits.
///
/// One decoder is used per message so the fragment count covers the whole tree.
#[derive(Debug)]
pub struct BodyDecoder {
    config: ParserConfig,
    parts_seen: usize,
}

impl BodyDecoder {
    /// Creates a decoder with the given limits.
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self {
            config,
            parts_seen: 0,
        }
    }

    /// Returns the number of multipart fragments consumed so far.
    #[must_use]
    pub const fn parts_seen(&self) -> usize {
        self.parts_seen
    }

    /// Splits, parses and decodes one raw entity at the given depth.
    ///
    /// Multipart children (depth above zero) may start with a blank line to
    /// signal an empty header section; the top-level message may not.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource limit is exceeded.
    pub fn parse_entity(&mut self, raw: &str, depth: usize) -> Result<Message> {
        let (header_block, body_block) = if depth == 0 {
            split_message(raw)
        } else {
            split_entity(raw)
        };
        let headers = Headers::parse(header_block);
        let mut message = Message::new(headers, body_block);

        match self.decode(&message.headers, body_block, depth)? {
            DecodedBody::Leaf { content, error } => {
                message.content = Some(content);
                message.decode_error = error;
            }
            DecodedBody::Parts(parts) => message.parts = parts,
        }

        Ok(message)
    }

    /// Decodes a body according to its headers.
    ///
    /// The transfer encoding is undone first, then the main type of
    /// `Content-Type` picks the path. Text, unknown and absent types become
    /// leaves; multipart bodies are split and each fragment parsed as an entity
    /// at `depth + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DepthLimitExceeded`] or [`Error::PartLimitExceeded`]
    /// when a limit is hit. Decode failures are reported in the leaf instead.
    pub fn decode(&mut self, headers: &Headers, body: &str, depth: usize) -> Result<DecodedBody> {
        let encoding = headers
            .get("Content-Transfer-Encoding")
            .map_or(TransferEncoding::Identity, TransferEncoding::parse);

        let (text, error) = match self.undo_transfer_encoding(encoding, body) {
            Ok(text) => (text, None),
            Err(err) => {
                warn!(%encoding, error = %err, "body left undecoded");
                (Cow::Borrowed(body), Some(err))
            }
        };

        let Some(content_type) = headers.get("Content-Type").map(ContentType::parse) else {
            trace!(depth, "no content type, treating as text");
            return Ok(leaf(&text, error));
        };

        match content_type.kind() {
            MediaKind::Multipart if error.is_none() => {
                self.decode_multipart(&content_type, &text, depth)
            }
            MediaKind::Text | MediaKind::Multipart | MediaKind::Other => Ok(leaf(&text, error)),
        }
    }

    fn undo_transfer_encoding<'a>(
        &self,
        encoding: TransferEncoding,
        body: &'a str,
    ) -> std::result::Result<Cow<'a, str>, DecodeError> {
        let bytes = match encoding {
            TransferEncoding::Base64 => decode_base64(body)?,
            TransferEncoding::QuotedPrintable if self.config.decode_quoted_printable => {
                decode_quoted_printable(body)
            }
            TransferEncoding::QuotedPrintable | TransferEncoding::Identity => {
                return Ok(Cow::Borrowed(body));
            }
        };
        debug!(%encoding, len = bytes.len(), "decoded body");
        Ok(Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn decode_multipart(
        &mut self,
        content_type: &ContentType,
        body: &str,
        depth: usize,
    ) -> Result<DecodedBody> {
        let Some(marker) = content_type.boundary_marker() else {
            warn!(depth, "multipart body without boundary, treating as text");
            return Ok(leaf(body, None));
        };

        let mut parts = Vec::new();
        for fragment in Fragments::entities(&marker, body) {
            if depth >= self.config.max_depth {
                return Err(Error::DepthLimitExceeded {
                    limit: self.config.max_depth,
                });
            }
            if self.parts_seen >= self.config.max_parts {
                return Err(Error::PartLimitExceeded {
                    limit: self.config.max_parts,
                });
            }
            self.parts_seen += 1;

            let part = self.parse_entity(fragment, depth + 1)?;
            trace!(index = parts.len() + 1, depth = depth + 1, "fragment added");
            parts.push(part);
        }

        if parts.is_empty() {
            warn!(depth, %marker, "no multipart fragments found, treating as text");
            return Ok(leaf(body, None));
        }

        debug!(count = parts.len(), depth, "multipart body split");
        Ok(DecodedBody::Parts(parts))
    }
}

fn leaf(text: &str, error: Option<DecodeError>) -> DecodedBody {
    let content = text.trim().to_string();
    debug!(len = content.len(), undecoded = error.is_some(), "leaf stored");
    DecodedBody::Leaf { content, error }
}

/// Decodes a top-level body with the default configuration.
///
/// # Errors
///
/// Returns an error if a resource limit is exceeded.
pub fn decode_body(headers: &Headers, body: &str) -> Result<DecodedBody> {
    BodyDecoder::new(ParserConfig::default()).decode(headers, body, 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::needless_collect)]
mod tests {
    use super::*;
    use crate::encoding::encode_base64;

    fn content_of(decoded: DecodedBody) -> (String, Option<DecodeError>) {
        match decoded {
            DecodedBody::Leaf { content, error } => (content, error),
            DecodedBody::Parts(_) => panic!("Expected leaf"),
        }
    }

    #[test]
    fn test_text_leaf_is_trimmed() {
        let headers = Headers::parse("Content-Type: text/plain");
        let (content, error) = content_of(decode_body(&headers, "\r\n  hi there \r\n").unwrap());
        assert_eq!(content, "hi there");
        assert_eq!(error, None);
    }

    #[test]
    fn test_missing_content_type_is_text() {
        let (content, _) = content_of(decode_body(&Headers::new(), "plain body").unwrap());
        assert_eq!(content, "plain body");
    }

    #[test]
    fn test_other_main_type_is_text() {
        let headers = Headers::parse("Content-Type: application/octet-stream");
        let (content, _) = content_of(decode_body(&headers, "raw").unwrap());
        assert_eq!(content, "raw");
    }

    #[test]
    fn test_base64_body() {
        let headers = Headers::parse("Content-Type: text/plain\nContent-Transfer-Encoding: base64");
        let body = encode_base64(b"decoded text\n");
        let (content, error) = content_of(decode_body(&headers, &body).unwrap());
        assert_eq!(content, "decoded text");
        assert_eq!(error, None);
    }

    #[test]
    fn test_invalid_base64_keeps_raw_body() {
        let headers = Headers::parse("Content-Type: text/plain\nContent-Transfer-Encoding: base64");
        let (content, error) = content_of(decode_body(&headers, "%%% not base64 %%%").unwrap());
        assert_eq!(content, "%%% not base64 %%%");
        assert!(matches!(error, Some(DecodeError::Base64(_))));
    }

    #[test]
    fn test_quoted_printable_is_opt_in() {
        let headers = Headers::parse(
            "Content-Type: text/plain\nContent-Transfer-Encoding: quoted-printable",
        );

        let (content, _) = content_of(decode_body(&headers, "caf=C3=A9").unwrap());
        assert_eq!(content, "caf=C3=A9");

        let mut decoder = BodyDecoder::new(ParserConfig::new().with_quoted_printable(true));
        let (content, _) = content_of(decoder.decode(&headers, "caf=C3=A9", 0).unwrap());
        assert_eq!(content, "café");
    }

    #[test]
    fn test_multipart_children() {
        let headers = Headers::parse("Content-Type: multipart/mixed; boundary=XYZ");
        let body = "--XYZ\r\nContent-Type: text/plain\r\n\r\nfirst\r\n--XYZ\r\n\r\nsecond\r\n--XYZ--";
        let mut decoder = BodyDecoder::new(ParserConfig::default());

        let DecodedBody::Parts(parts) = decoder.decode(&headers, body, 0).unwrap() else {
            panic!("Expected parts");
        };
        let texts: Vec<_> = parts.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(parts[0].headers.get("Content-Type"), Some("text/plain"));
        assert!(parts[1].headers.is_empty());
        assert_eq!(decoder.parts_seen(), 2);
    }

    #[test]
    fn test_multipart_without_boundary_falls_back_to_text() {
        let headers = Headers::parse("Content-Type: multipart/mixed");
        let (content, _) = content_of(decode_body(&headers, "--x\nbody\n--x").unwrap());
        assert_eq!(content, "--x\nbody\n--x");
    }

    #[test]
    fn test_multipart_without_fragments_falls_back_to_text() {
        let headers = Headers::parse("Content-Type: multipart/mixed; boundary=XYZ");
        let (content, _) = content_of(decode_body(&headers, "--XYZ\nonly one marker").unwrap());
        assert_eq!(content, "--XYZ\nonly one marker");
    }

    #[test]
    fn test_part_limit() {
        let headers = Headers::parse("Content-Type: multipart/mixed; boundary=b");
        let mut decoder = BodyDecoder::new(ParserConfig::new().with_max_parts(2));
        let err = decoder.decode(&headers, "--b1--b2--b3--b", 0).unwrap_err();
        assert!(matches!(err, Error::PartLimitExceeded { limit: 2 }));
    }

    #[test]
    fn test_depth_limit() {
        let headers = Headers::parse("Content-Type: multipart/mixed; boundary=b");
        let mut decoder = BodyDecoder::new(ParserConfig::new().with_max_depth(0));
        let err = decoder.decode(&headers, "--b one --b", 0).unwrap_err();
        assert!(matches!(err, Error::DepthLimitExceeded { limit: 0 }));
    }
}
