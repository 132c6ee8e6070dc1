//! `mailsift` - dump a raw email message as a JSON MIME tree.
//!
//! Reads one message from a file (or stdin with `-`), parses it with
//! `mailsift-mime` and writes the resulting tree to stdout.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as _;
use mailsift_mime::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PARTS, Parser, ParserConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments.
#[derive(Debug, clap::Parser)]
#[command(name = "mailsift", version, about)]
struct Args {
    /// Message file to parse, `-` for stdin.
    input: PathBuf,

    /// Deepest multipart nesting accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Total multipart fragments accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_PARTS)]
    max_parts: usize,

    /// Decode quoted-printable bodies.
    #[arg(long)]
    quoted_printable: bool,

    /// Write JSON on a single line.
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn config(&self) -> ParserConfig {
        ParserConfig::new()
            .with_max_depth(self.max_depth)
            .with_max_parts(self.max_parts)
            .with_quoted_printable(self.quoted_printable)
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut raw = Vec::new();
        io::stdin()
            .read_to_end(&mut raw)
            .context("Failed to read message from stdin")?;
        Ok(raw)
    } else {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsift=info,mailsift_mime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let parser = Parser::with_config(args.config()).context("Invalid parser limits")?;

    let raw = read_input(&args.input)?;
    info!(bytes = raw.len(), input = %args.input.display(), "Parsing message");

    let message = parser
        .parse_bytes(&raw)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    for error in message.decode_errors() {
        warn!(%error, "Part left undecoded");
    }

    let mut stdout = io::stdout().lock();
    if args.compact {
        serde_json::to_writer(&mut stdout, &message)?;
    } else {
        serde_json::to_writer_pretty(&mut stdout, &message)?;
    }
    writeln!(stdout)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["mailsift", "message.eml"]).unwrap();
        assert_eq!(args.config(), ParserConfig::default());
        assert!(!args.compact);
    }

    #[test]
    fn test_args_limits() {
        let args = Args::try_parse_from([
            "mailsift",
            "-",
            "--max-depth",
            "4",
            "--max-parts",
            "32",
            "--quoted-printable",
            "--compact",
        ])
        .unwrap();
        let config = args.config();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_parts, 32);
        assert!(config.decode_quoted_printable);
        assert!(args.compact);
    }
}
