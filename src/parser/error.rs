//! Error types for reference normalization.

use thiserror::Error;

use crate::policy::MAX_REFERENCE_LENGTH;

/// Errors that stop the pipeline before validation can run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Reference could not be turned into an http(s) URL with a host
    #[error("reference not parseable: {reason}")]
    Unparseable {
        /// The reference that failed, percent-encoded for display
        reference: String,
        /// Why the reference is unusable
        reason: String,
    },

    /// Reference exceeds the maximum accepted length
    #[error("reference not parseable: too long ({length} chars, max {max})")]
    TooLong {
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl ParseError {
    /// Creates an `Unparseable` error from a URL parser failure.
    #[must_use]
    pub fn malformed(reference: &str, parse_error: &str) -> Self {
        Self::Unparseable {
            reference: urlencoding::encode(reference).into_owned(),
            reason: parse_error.to_string(),
        }
    }

    /// Creates an `Unparseable` error for a URL without a host.
    #[must_use]
    pub fn no_host(reference: &str) -> Self {
        Self::Unparseable {
            reference: urlencoding::encode(reference).into_owned(),
            reason: "URL has no host".to_string(),
        }
    }

    /// Creates an `Unparseable` error for a scheme other than http or https.
    #[must_use]
    pub fn unsupported_scheme(reference: &str, scheme: &str) -> Self {
        Self::Unparseable {
            reference: urlencoding::encode(reference).into_owned(),
            reason: format!("scheme '{}' is not supported", urlencoding::encode(scheme)),
        }
    }

    /// Creates a `TooLong` error.
    #[must_use]
    pub fn too_long(reference: &str) -> Self {
        Self::TooLong {
            length: reference.chars().count(),
            max: MAX_REFERENCE_LENGTH,
        }
    }
}
