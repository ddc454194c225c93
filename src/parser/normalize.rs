//! Reference normalization: custom-scheme rewriting, default scheme, URL parsing.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use super::error::ParseError;
use crate::policy::{InputConvention, LinkPolicy, MAX_REFERENCE_LENGTH};

/// Web scheme of a normalized reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme token without `://`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference reduced to scheme, authority, path and ordered query pairs.
///
/// `query` keeps duplicate keys; the validator reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub scheme: Scheme,
    /// Host, plus `:port` when a non-default port was given
    pub host: String,
    /// Path as serialized by the URL parser (percent-encoded once)
    pub path: String,
    /// Decoded query pairs in input order
    pub query: Vec<(String, String)>,
}

impl NormalizedUrl {
    /// Host and path with no scheme and no query, trailing `?` removed.
    #[must_use]
    pub fn authority_path(&self) -> String {
        let joined = format!("{}{}", self.host, self.path);
        match joined.strip_suffix('?') {
            Some(stripped) => stripped.to_string(),
            None => joined,
        }
    }

    /// First value of the query parameter `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over query parameter names in input order, duplicates included.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.query.iter().map(|(key, _)| key.as_str())
    }
}

/// Normalizes a location fragment according to the policy's input convention.
///
/// A leading `#` is stripped. Empty input is not special-cased here; callers
/// skip the pipeline when there is nothing to parse.
///
/// # Errors
///
/// Returns [`ParseError`] when the reference cannot become an http(s) URL with a host.
#[tracing::instrument(skip(location_hash, policy), fields(input_len = location_hash.len(), convention = %policy.convention))]
pub fn normalize(location_hash: &str, policy: &LinkPolicy) -> Result<NormalizedUrl, ParseError> {
    let raw = strip_fragment_marker(location_hash);

    if raw.chars().count() > MAX_REFERENCE_LENGTH {
        return Err(ParseError::too_long(raw));
    }

    match policy.convention {
        InputConvention::Fragment => parse_web_reference(raw, policy),
        InputConvention::LegacyQuery => normalize_legacy_query(raw, policy),
    }
}

/// Removes the leading fragment marker and surrounding whitespace.
#[must_use]
pub fn strip_fragment_marker(location_hash: &str) -> &str {
    let trimmed = location_hash.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).trim()
}

/// Rewrites custom schemes to their web equivalents and adds `https://` when no
/// recognized scheme is present.
#[must_use]
pub fn rewrite_scheme(raw: &str, policy: &LinkPolicy) -> String {
    let secure_prefix = format!("{}://", policy.secure_scheme);
    let insecure_prefix = format!("{}://", policy.insecure_scheme);

    let rewritten = if let Some(rest) = strip_prefix_ignore_case(raw, &secure_prefix) {
        format!("https://{rest}")
    } else if let Some(rest) = strip_prefix_ignore_case(raw, &insecure_prefix) {
        format!("http://{rest}")
    } else {
        raw.to_string()
    };

    if strip_prefix_ignore_case(&rewritten, "https://").is_some()
        || strip_prefix_ignore_case(&rewritten, "http://").is_some()
    {
        rewritten
    } else {
        trace!("no scheme given, defaulting to https");
        format!("https://{rewritten}")
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}

fn parse_web_reference(raw: &str, policy: &LinkPolicy) -> Result<NormalizedUrl, ParseError> {
    let candidate = rewrite_scheme(raw, policy);
    let parsed = Url::parse(&candidate).map_err(|e| ParseError::malformed(raw, &e.to_string()))?;

    let scheme = match parsed.scheme() {
        "https" => Scheme::Https,
        "http" => Scheme::Http,
        other => return Err(ParseError::unsupported_scheme(raw, other)),
    };

    let Some(host) = parsed.host_str().filter(|host| !host.is_empty()) else {
        return Err(ParseError::no_host(raw));
    };
    let host = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let query = parsed
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let normalized = NormalizedUrl {
        scheme,
        host,
        path: parsed.path().to_string(),
        query,
    };
    debug!(scheme = %normalized.scheme, authority_path = %normalized.authority_path(), "reference normalized");
    Ok(normalized)
}

/// Reads `#repo=<url>&fingerprint=..&package=..`.
///
/// Fragment pairs come first, followed by pairs carried inside the `repo` URL.
/// A missing `repo` yields an empty host and path; the validator reports it.
fn normalize_legacy_query(raw: &str, policy: &LinkPolicy) -> Result<NormalizedUrl, ParseError> {
    let mut query: Vec<(String, String)> = url::form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let repo = query
        .iter()
        .find(|(key, _)| key == "repo")
        .map(|(_, value)| value.clone());

    let Some(repo) = repo else {
        debug!("legacy reference has no repo parameter");
        return Ok(NormalizedUrl {
            scheme: Scheme::default(),
            host: String::new(),
            path: String::new(),
            query,
        });
    };

    let inner = parse_web_reference(&repo, policy)?;
    query.extend(inner.query);
    Ok(NormalizedUrl { query, ..inner })
}
