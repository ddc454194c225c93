//! Repository reference parsing: normalize, validate, build links.
//!
//! A reference is the text after `#` in a share-page location, for example
//! `https://fdroid.link/#https://f-droid.org/repo?fingerprint=...`. It may be
//! written three ways:
//!
//! - bare `host/path`, which defaults to https
//! - `https://...` or `http://...`
//! - the F-Droid custom schemes `fdroidrepos://...` and `fdroidrepo://...`
//!
//! Each run is a pure function of its input. Only an unparseable reference
//! stops the pipeline early; every other check reports and continues.
//!
//! # Example
//!
//! ```
//! use fdroid_link_core::LinkPolicy;
//! use fdroid_link_core::parser::{LinkOutcome, Trust, parse_reference};
//!
//! let outcome = parse_reference("#f-droid.org/repo", &LinkPolicy::default());
//! let LinkOutcome::Validated { result, links } = outcome else {
//!     panic!("reference should parse");
//! };
//! assert_eq!(result.trust, Some(Trust::Official));
//! assert_eq!(links.unwrap().http_address, "https://f-droid.org/repo");
//! ```

mod diagnostic;
mod error;
mod links;
mod normalize;
mod validate;

pub use diagnostic::{ErrorKind, InfoKind, Trust, WarningKind};
pub use error::ParseError;
pub use links::{LinkSet, build_links};
pub use normalize::{NormalizedUrl, Scheme, normalize, rewrite_scheme, strip_fragment_marker};
pub use validate::{ValidationResult, classify_trust, is_valid_fingerprint, validate};

use tracing::{debug, info};

use crate::policy::LinkPolicy;

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Nothing to parse; the pipeline did not run
    NoInput,
    /// The reference could not be parsed at all
    Unparseable(ParseError),
    /// Validation ran; `links` is present iff `result` has no errors
    Validated {
        result: ValidationResult,
        links: Option<LinkSet>,
    },
}

impl LinkOutcome {
    /// Returns true if the run produced at least one fatal error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        match self {
            Self::NoInput => false,
            Self::Unparseable(_) => true,
            Self::Validated { result, .. } => !result.is_usable(),
        }
    }
}

/// Runs the pipeline on a location fragment (leading `#` optional).
#[tracing::instrument(skip(location_hash, policy), fields(input_len = location_hash.len()))]
#[must_use]
pub fn parse_reference(location_hash: &str, policy: &LinkPolicy) -> LinkOutcome {
    if strip_fragment_marker(location_hash).is_empty() {
        debug!("Empty reference provided");
        return LinkOutcome::NoInput;
    }

    let url = match normalize(location_hash, policy) {
        Ok(url) => url,
        Err(e) => {
            info!(error = %e, "Reference not parseable");
            return LinkOutcome::Unparseable(e);
        }
    };

    let result = validate(&url, policy);
    let links = build_links(&result, policy);

    info!(
        authority_path = %result.repo_authority_path,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        linked = links.is_some(),
        "Reference processed"
    );

    LinkOutcome::Validated { result, links }
}

/// Runs the pipeline on a full page location, using the text after the first `#`.
///
/// A location without a fragment has no input.
#[must_use]
pub fn parse_location(page_url: &str, policy: &LinkPolicy) -> LinkOutcome {
    match page_url.split_once('#') {
        Some((_, fragment)) => parse_reference(fragment, policy),
        None => {
            debug!("Location has no fragment");
            LinkOutcome::NoInput
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::policy::OFFICIAL_FINGERPRINT;

    fn run(reference: &str) -> LinkOutcome {
        parse_reference(reference, &LinkPolicy::default())
    }

    #[test]
    fn test_parse_reference_empty_is_no_input() {
        assert_eq!(run(""), LinkOutcome::NoInput);
        assert_eq!(run("#"), LinkOutcome::NoInput);
        assert_eq!(run("   "), LinkOutcome::NoInput);
        assert!(!run("").has_errors());
    }

    #[test]
    fn test_parse_reference_unparseable_short_circuits() {
        let outcome = run("https://[oops");
        assert!(matches!(outcome, LinkOutcome::Unparseable(_)));
        assert!(outcome.has_errors());
    }

    #[test]
    fn test_parse_reference_links_only_without_errors() {
        let LinkOutcome::Validated { result, links } = run("example.com/fdroid/repo?foo=bar")
        else {
            panic!("expected validation");
        };
        assert!(!result.errors.is_empty());
        assert!(links.is_none());
    }

    #[test]
    fn test_parse_reference_is_idempotent() {
        let reference = format!("#https://mirror.example.com/fdroid/repo?fingerprint={OFFICIAL_FINGERPRINT}");
        assert_eq!(run(&reference), run(&reference));
    }

    #[test]
    fn test_parse_location_uses_fragment() {
        let outcome = parse_location(
            "https://fdroid.link/#https://f-droid.org/repo",
            &LinkPolicy::default(),
        );
        let LinkOutcome::Validated { result, .. } = outcome else {
            panic!("expected validation");
        };
        assert_eq!(result.repo_authority_path, "f-droid.org/repo");
    }

    #[test]
    fn test_parse_location_without_fragment_is_no_input() {
        let policy = LinkPolicy::default();
        assert_eq!(parse_location("https://fdroid.link/", &policy), LinkOutcome::NoInput);
        assert_eq!(parse_location("https://fdroid.link/#", &policy), LinkOutcome::NoInput);
    }

    #[test]
    fn test_parse_location_keeps_later_hashes_in_reference() {
        let outcome = parse_location(
            "https://fdroid.link/#example.com/fdroid/repo#ignored",
            &LinkPolicy::default(),
        );
        let LinkOutcome::Validated { result, .. } = outcome else {
            panic!("expected validation");
        };
        assert_eq!(result.repo_authority_path, "example.com/fdroid/repo");
    }
}
