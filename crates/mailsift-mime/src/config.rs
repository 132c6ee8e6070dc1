//! Parser limits and options.

use crate::error::{Error, Result};

/// Default maximum multipart nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Default maximum number of multipart fragments in one message.
pub const DEFAULT_MAX_PARTS: usize = 1024;

/// Settings for a [`Parser`](crate::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Deepest multipart nesting accepted. The top-level entity is depth 0.
    pub max_depth: usize,
    /// Total multipart fragments accepted across the whole tree.
    pub max_parts: usize,
    /// Decode `Content-Transfer-Encoding: quoted-printable` bodies.
    pub decode_quoted_printable: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_parts: DEFAULT_MAX_PARTS,
            decode_quoted_printable: false,
        }
    }
}

impl ParserConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum fragment count.
    #[must_use]
    pub const fn with_max_parts(mut self, max_parts: usize) -> Self {
        self.max_parts = max_parts;
        self
    }

    /// Enables or disables quoted-printable body decoding.
    #[must_use]
    pub const fn with_quoted_printable(mut self, enabled: bool) -> Self {
        self.decode_quoted_printable = enabled;
        self
    }

    /// Checks that the limits can admit any multipart message at all.
    ///
    /// `max_depth` of zero is allowed and means "never descend".
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `max_parts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_parts == 0 {
            return Err(Error::InvalidConfig(
                "max_parts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::new();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_parts, DEFAULT_MAX_PARTS);
        assert!(!config.decode_quoted_printable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::new()
            .with_max_depth(2)
            .with_max_parts(8)
            .with_quoted_printable(true);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_parts, 8);
        assert!(config.decode_quoted_printable);
    }

    #[test]
    fn test_validate_rejects_zero_parts() {
        let err = ParserConfig::new().with_max_parts(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(ParserConfig::new().with_max_depth(0).validate().is_ok());
    }
}
