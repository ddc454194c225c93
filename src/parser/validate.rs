//! Structural validation and trust classification of normalized references.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::diagnostic::{ErrorKind, InfoKind, Trust, WarningKind};
use super::normalize::{NormalizedUrl, Scheme};
use crate::policy::LinkPolicy;

/// Signing key fingerprint: SHA-256 as 64 hex digits, any case.
#[allow(clippy::expect_used)]
static FINGERPRINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{64}$").expect("fingerprint regex is valid") // Static pattern, safe to panic
});

/// Outcome of validating one normalized reference.
///
/// Diagnostics appear in the order the checks ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Host and path, no scheme, no query
    pub repo_authority_path: String,
    /// Supplied fingerprint, format-checked only
    pub fingerprint: Option<String>,
    /// Package id (legacy query convention only)
    pub package: Option<String>,
    pub scheme: Scheme,
    /// `None` when fatal errors prevented classification
    pub trust: Option<Trust>,
    pub errors: Vec<ErrorKind>,
    pub warnings: Vec<WarningKind>,
    pub info_notices: Vec<InfoKind>,
}

impl ValidationResult {
    /// Returns true if no fatal error was recorded.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Returns true if `value` is 64 hexadecimal characters.
#[must_use]
pub fn is_valid_fingerprint(value: &str) -> bool {
    FINGERPRINT_PATTERN.is_match(value)
}

/// Validates a normalized reference.
///
/// Every check runs and appends to the matching list; trust is classified
/// only when no fatal error was found.
#[tracing::instrument(skip(url, policy), fields(host = %url.host))]
#[must_use]
pub fn validate(url: &NormalizedUrl, policy: &LinkPolicy) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut info_notices = Vec::new();

    if has_duplicate_parameters(url) {
        trace!("duplicate query parameters");
        errors.push(ErrorKind::DuplicateParameter);
    }

    for required in policy.convention.required_parameters() {
        if url.parameter(required).is_none() {
            trace!(parameter = required, "required parameter missing");
            errors.push(ErrorKind::MissingParameter((*required).to_string()));
        }
    }

    let recognized = policy.convention.recognized_parameters();
    let mut reported = HashSet::new();
    for name in url.parameter_names() {
        if !recognized.contains(&name) && reported.insert(name) {
            trace!(parameter = name, "unsupported parameter");
            errors.push(ErrorKind::UnsupportedParameter(name.to_string()));
        }
    }

    if url.path.is_empty() || url.path == "/" {
        warnings.push(WarningKind::PathMissing);
    }

    let repo_authority_path = url.authority_path();
    if !policy.has_repo_shape(&repo_authority_path) {
        warnings.push(WarningKind::PathShapeUnrecognized);
    }

    let fingerprint = url
        .parameter("fingerprint")
        .map(|value| value.strip_suffix('?').unwrap_or(value))
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);
    match fingerprint.as_deref() {
        None => warnings.push(WarningKind::FingerprintMissing),
        Some(value) if !is_valid_fingerprint(value) => {
            warnings.push(WarningKind::FingerprintMalformed);
        }
        Some(_) => {}
    }

    if url.scheme == Scheme::Http {
        warnings.push(WarningKind::InsecureScheme);
    }

    let trust = if errors.is_empty() {
        let trust = classify_trust(&repo_authority_path, fingerprint.as_deref(), policy);
        match trust {
            Trust::Official => {}
            Trust::OfficialMirror => info_notices.push(InfoKind::VerifiedMirror),
            Trust::ThirdParty => warnings.push(WarningKind::ThirdPartyRepository),
        }
        Some(trust)
    } else {
        None
    };

    let package = url
        .parameter("package")
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        trust = ?trust,
        "reference validated"
    );

    ValidationResult {
        repo_authority_path,
        fingerprint,
        package,
        scheme: url.scheme,
        trust,
        errors,
        warnings,
        info_notices,
    }
}

/// Three-way trust decision: allow-listed location, then official key, else third party.
#[must_use]
pub fn classify_trust(
    repo_authority_path: &str,
    fingerprint: Option<&str>,
    policy: &LinkPolicy,
) -> Trust {
    if policy.is_official_location(repo_authority_path) {
        Trust::Official
    } else if fingerprint.is_some_and(|fp| policy.is_official_fingerprint(fp)) {
        Trust::OfficialMirror
    } else {
        Trust::ThirdParty
    }
}

fn has_duplicate_parameters(url: &NormalizedUrl) -> bool {
    let mut seen = HashSet::new();
    url.parameter_names().any(|name| !seen.insert(name))
}
