//! Redaction of emails and opaque tokens before they reach the logs.

use std::fmt;

use lazy_regex::{lazy_regex, Captures, Lazy, Regex};

static EMAIL: Lazy<Regex> = lazy_regex!(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b");

/// JWT: three base64url segments separated by dots.
static JWT: Lazy<Regex> = lazy_regex!(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b");

/// Base64 or hex runs of 16+ chars (secrets, signatures, digests).
static OPAQUE: Lazy<Regex> = lazy_regex!(r"\b[A-Za-z0-9+/]{16,}={0,2}");

/// Mask emails (`u***@example.com`) and replace tokens with `[REDACTED_TOKEN]`.
///
/// Emails go first so their domains are not mistaken for tokens.
pub fn redact(input: &str) -> String {
    let emails = EMAIL.replace_all(input, |caps: &Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });
    let jwts = JWT.replace_all(&emails, "[REDACTED_TOKEN]");
    OPAQUE
        .replace_all(&jwts, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper applying [`redact`] lazily, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
