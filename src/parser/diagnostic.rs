//! Diagnostic kinds produced by validation, with their user-facing messages.
//!
//! Values that originate from the reference are percent-encoded before they
//! are placed in a message, so messages never carry markup from the input.

use std::fmt;

use serde::Serialize;

/// Fatal problems: any of these suppresses link construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The reference could not be parsed into an http(s) URL.
    UnparseableReference(String),
    /// A query parameter name appears more than once.
    DuplicateParameter,
    /// A parameter required by the active input convention is absent.
    MissingParameter(String),
    /// A query parameter outside the recognized set.
    UnsupportedParameter(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparseableReference(reason) => write!(f, "{reason}"),
            Self::DuplicateParameter => write!(f, "parameter duplicates are not allowed"),
            Self::MissingParameter(name) => {
                write!(f, "parameter missing: {}", urlencoding::encode(name))
            }
            Self::UnsupportedParameter(name) => {
                write!(f, "parameter not supported: {}", urlencoding::encode(name))
            }
        }
    }
}

/// Advisory problems: shown to the user, never blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    PathMissing,
    PathShapeUnrecognized,
    FingerprintMissing,
    FingerprintMalformed,
    InsecureScheme,
    ThirdPartyRepository,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::PathMissing => "path missing",
            Self::PathShapeUnrecognized => {
                "path does not look like an F-Droid repository (expected .../fdroid/repo or .../fdroid/archive)"
            }
            Self::FingerprintMissing => {
                "fingerprint missing (important for verifying the signing key)"
            }
            Self::FingerprintMalformed => {
                "fingerprint malformed (expected 64 hexadecimal characters)"
            }
            Self::InsecureScheme => "not using https",
            Self::ThirdPartyRepository => {
                "third-party repository: content is not vetted for security issues"
            }
        };
        f.write_str(message)
    }
}

/// Informational notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    VerifiedMirror,
}

impl fmt::Display for InfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerifiedMirror => {
                f.write_str("this is a verified mirror of the official F-Droid repository")
            }
        }
    }
}

/// Trust classification of a validated reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Trust {
    Official,
    OfficialMirror,
    ThirdParty,
}

impl fmt::Display for Trust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Official => write!(f, "official"),
            Self::OfficialMirror => write!(f, "official mirror"),
            Self::ThirdParty => write!(f, "third party"),
        }
    }
}
