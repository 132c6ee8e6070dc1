//! Transfer-encoding decoders.
//!
//! Supports Base64 and Quoted-Printable bodies (RFC 2045 §6.7, §6.8).

use crate::error::DecodeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Whitespace (including the line breaks mail writers insert every 76
/// characters) is ignored.
///
/// # Errors
///
/// Returns an error if the remaining input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// Soft line breaks (`=` at end of line) are removed and `=XX` escapes are
/// replaced by the byte they name. Lower-case hex is accepted. An `=` that
/// starts neither is kept as a literal character.
#[must_use]
pub fn decode_quoted_printable(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        match (bytes.get(i + 1), bytes.get(i + 2)) {
            // Soft line break
            (Some(b'\r'), Some(b'\n')) => i += 3,
            (Some(b'\r' | b'\n'), _) => i += 2,
            (Some(&hi), Some(&lo)) => {
                if let (Some(hi), Some(lo)) = (hex_digit(hi), hex_digit(lo)) {
                    result.push((hi << 4) | lo);
                    i += 3;
                } else {
                    result.push(b'=');
                    i += 1;
                }
            }
            _ => {
                result.push(b'=');
                i += 1;
            }
        }
    }

    result
}

const fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
