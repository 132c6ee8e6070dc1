//! # mailsift-mime
//!
//! Best-effort decomposition of raw RFC 5322 / MIME messages.
//!
//! ## Features
//!
//! - **Header parsing**: Unfolding, ordered last-wins field map
//! - **Summary fields**: Sender, recipient, subject, originating IP
//! - **Body decoding**: Base64, optional Quoted-Printable
//! - **Multipart**: Boundary splitting with recursion into child parts
//! - **Limits**: Bounded nesting depth and fragment count
//!
//! Malformed input degrades instead of failing: a missing blank line, a
//! missing `Content-Type` or a header line without a colon all produce
//! defaults. Undecodable bodies are kept as-is and flagged.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsift_mime::parse_mail;
//!
//! let raw = "From: sender@example.com\r\n\
//!            To: recipient@example.com\r\n\
//!            Subject: Test\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            Hello, World!";
//!
//! let message = parse_mail(raw)?;
//! println!("Subject: {}", message.subject);
//! println!("Body: {}", message.text());
//! ```
//!
//! ### Limits
//!
//! ```ignore
//! use mailsift_mime::{Parser, ParserConfig};
//!
//! let parser = Parser::with_config(
//!     ParserConfig::new()
//!         .with_max_depth(4)
//!         .with_max_parts(64)
//!         .with_quoted_printable(true),
//! )?;
//! let message = parser.parse(raw)?;
//! message.ensure_decoded()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod content_type;
mod decode;
mod error;
mod header;
mod message;
mod parser;

pub mod encoding;
pub mod extract;
pub mod split;

pub use config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PARTS, ParserConfig};
pub use content_type::{ContentType, MediaKind};
pub use decode::{BodyDecoder, DecodedBody, decode_body};
pub use error::{DecodeError, Error, Result};
pub use header::Headers;
pub use message::{Message, TransferEncoding};
pub use parser::{Parser, parse_mail};
