//! Address and IP extraction from free-form header text.
//!
//! Both extractors return every match in order of appearance. Callers decide
//! what zero, one or many matches mean for them.

use regex::Regex;
use std::sync::LazyLock;

/// Local part of dotted atoms or a quoted string, then a dotted hostname or
/// a bracketed IPv4 literal.
#[allow(clippy::expect_used)] // literal pattern
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?:[^<>()\[\]\\.,;:\s@"]+(?:\.[^<>()\[\]\\.,;:\s@"]+)*|"[^"\r\n]+")"#,
        r"@",
        r"(?:\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]|(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,})",
    ))
    .expect("email pattern")
});

#[allow(clippy::expect_used)] // literal pattern
static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}").expect("ipv4 pattern")
});

/// Returns every e-mail address found in `text`.
#[must_use]
pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns every dotted-quad IPv4 address found in `text`.
///
/// Octet ranges are not checked; `999.1.1.1` matches.
#[must_use]
pub fn extract_ips(text: &str) -> Vec<String> {
    IPV4.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
