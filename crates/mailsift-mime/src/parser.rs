//! Message parsing entry point.

use crate::config::ParserConfig;
use crate::decode::BodyDecoder;
use crate::error::Result;
use crate::message::Message;
use tracing::debug;

/// Parses raw messages into [`Message`] trees.
///
/// A parser holds only its configuration and can be reused and shared
/// across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one raw message.
    ///
    /// Malformed input degrades to default values rather than failing.
    /// Bodies that cannot be decoded are kept undecoded and reported through
    /// [`Message::decode_error`].
    ///
    /// # Errors
    ///
    /// Returns an error only when a nesting depth or fragment count limit is
    /// exceeded.
    pub fn parse(&self, raw: &str) -> Result<Message> {
        let mut decoder = BodyDecoder::new(self.config);
        let message = decoder.parse_entity(raw, 0)?;
        debug!(
            fields = message.headers.len(),
            parts = decoder.parts_seen(),
            "parsed message"
        );
        Ok(message)
    }

    /// Parses one raw message held as bytes. Invalid UTF-8 is replaced.
    ///
    /// # Errors
    ///
    /// Same as [`Parser::parse`].
    pub fn parse_bytes(&self, raw: &[u8]) -> Result<Message> {
        self.parse(&String::from_utf8_lossy(raw))
    }
}

/// Parses one raw message with the default limits.
///
/// # Errors
///
/// Returns an error only when a resource limit is exceeded.
pub fn parse_mail(raw: &str) -> Result<Message> {
    Parser::new().parse(raw)
}
