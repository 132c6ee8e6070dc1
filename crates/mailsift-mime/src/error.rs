//! Error types for MIME parsing.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a parse or a strict accessor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Multipart nesting went deeper than the configured limit.
    #[error("MIME nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded {
        /// Configured maximum depth.
        limit: usize,
    },

    /// More multipart fragments than the configured limit.
    #[error("Multipart fragment count exceeds limit of {limit}")]
    PartLimitExceeded {
        /// Configured maximum fragment count.
        limit: usize,
    },

    /// A body could not be decoded according to its transfer encoding.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Parser configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Transfer-encoding failures.
///
/// Only base64 can fail: quoted-printable decoding keeps malformed escapes
/// as literal text.
///
/// These never abort a parse. The affected entity keeps its undecoded body
/// and carries the error in [`Message::decode_error`](crate::Message::decode_error).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_messages() {
        let err = Error::DepthLimitExceeded { limit: 4 };
        assert_eq!(err.to_string(), "MIME nesting depth exceeds limit of 4");

        let err = Error::PartLimitExceeded { limit: 10 };
        assert_eq!(
            err.to_string(),
            "Multipart fragment count exceeds limit of 10"
        );
    }

    #[test]
    fn test_decode_error_is_transparent() {
        let err: Error = DecodeError::Base64(base64::DecodeError::InvalidPadding).into();
        assert_eq!(err.to_string(), "Base64 decode error: Invalid padding");
    }
}
