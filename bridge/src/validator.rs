//! YouTube URL allow-list
//!
//! This is a gate, not a full validity check: unusual but real YouTube links
//! may be rejected, anything outside the allow-list never passes.

use std::fmt;
use url::Url;

const SHORT_HOSTS: [&str; 2] = ["youtu.be", "www.youtu.be"];
const WATCH_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];
const WATCH_PREFIXES: [&str; 4] = ["/watch", "/shorts", "/live", "/embed"];

/// A URL that passed [`validate`]; the only input the command runner accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(String);

impl ValidatedUrl {
    /// Run the allow-list and keep the caller's exact text on success
    pub fn parse(raw: &str) -> Option<Self> {
        validate(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decide whether `raw` is an acceptable YouTube URL
pub fn validate(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    // The host must be the whole authority: no port, no credentials
    if url.port().is_some() || !url.username().is_empty() || url.password().is_some() {
        return false;
    }

    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    // The raw text is what reaches the device, so it must read the same way
    if !raw_authority_is(raw, &host) {
        return false;
    }
    let path = url.path();

    if SHORT_HOSTS.contains(&host.as_str()) {
        return !path.is_empty() && path != "/";
    }
    if WATCH_HOSTS.contains(&host.as_str()) {
        return WATCH_PREFIXES.iter().any(|prefix| path.starts_with(prefix));
    }

    false
}

/// Whether the authority written in `raw` is exactly `host`
///
/// The parser forgives backslashes, embedded tabs and newlines, percent
/// escapes in the host and a missing `//`; other parsers on the device do not.
fn raw_authority_is(raw: &str, host: &str) -> bool {
    if raw.chars().any(|c| c.is_ascii_control()) {
        return false;
    }
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    rest[..end].eq_ignore_ascii_case(host)
}
