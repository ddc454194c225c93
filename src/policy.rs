//! Immutable link policy: trust allow-list, official fingerprint, schemes and hosts.
//!
//! Every stage of the pipeline reads its constants from a [`LinkPolicy`]
//! value instead of compiled-in globals, so trust decisions can be tested
//! against substitute lists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fingerprint of the key that signs the official F-Droid repository.
pub const OFFICIAL_FINGERPRINT: &str =
    "43238D512C1E5EB2D6569F4A3AFBF5523418B82E0A3ED1552770ABB9A9C9CCAB";

/// Onion service hosting the official repository.
const OFFICIAL_ONION_HOST: &str = "fdroidorg6cooksyluodepej4erfctzk7rrjpjbbr6wx24jh3lqyfwyd.onion";

/// Host serving universal share links.
pub const DEFAULT_SHARE_HOST: &str = "fdroid.link";

/// Custom scheme token for repositories reached over https.
pub const DEFAULT_SECURE_SCHEME: &str = "fdroidrepos";

/// Custom scheme token for repositories reached over plain http.
pub const DEFAULT_INSECURE_SCHEME: &str = "fdroidrepo";

/// Maximum reference length to accept (same limit as a browser address bar).
pub const MAX_REFERENCE_LENGTH: usize = 2000;

/// Which fragment layout the normalizer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputConvention {
    /// The fragment is the repository URL itself: `#https://host/fdroid/repo?fingerprint=..`
    #[default]
    Fragment,
    /// Deprecated layout where the fragment is a query string: `#repo=<url>&fingerprint=..`
    LegacyQuery,
}

impl InputConvention {
    /// Query parameter names accepted under this convention.
    #[must_use]
    pub fn recognized_parameters(self) -> &'static [&'static str] {
        match self {
            Self::Fragment => &["fingerprint"],
            Self::LegacyQuery => &["repo", "fingerprint", "package"],
        }
    }

    /// Query parameter names that must be present under this convention.
    #[must_use]
    pub fn required_parameters(self) -> &'static [&'static str] {
        match self {
            Self::Fragment => &[],
            Self::LegacyQuery => &["repo"],
        }
    }

    /// Returns the stable label used in config files and CLI output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fragment => "fragment",
            Self::LegacyQuery => "legacy-query",
        }
    }
}

impl fmt::Display for InputConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration shared by the normalizer, validator and link builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    /// `host/path` locations of the official repository and its archive.
    pub official_locations: Vec<String>,
    /// Signing key fingerprint of the official repository.
    pub official_fingerprint: String,
    /// Path suffixes that identify a repository index location.
    pub repo_path_suffixes: Vec<String>,
    /// Custom scheme token standing in for `https`.
    pub secure_scheme: String,
    /// Custom scheme token standing in for `http`.
    pub insecure_scheme: String,
    /// Host that serves universal share links.
    pub share_host: String,
    /// Fragment layout to parse.
    pub convention: InputConvention,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            official_locations: vec![
                "f-droid.org/repo".to_string(),
                "f-droid.org/archive".to_string(),
                format!("{OFFICIAL_ONION_HOST}/fdroid/repo"),
                format!("{OFFICIAL_ONION_HOST}/fdroid/archive"),
            ],
            official_fingerprint: OFFICIAL_FINGERPRINT.to_string(),
            repo_path_suffixes: vec!["/fdroid/repo".to_string(), "/fdroid/archive".to_string()],
            secure_scheme: DEFAULT_SECURE_SCHEME.to_string(),
            insecure_scheme: DEFAULT_INSECURE_SCHEME.to_string(),
            share_host: DEFAULT_SHARE_HOST.to_string(),
            convention: InputConvention::default(),
        }
    }
}

impl LinkPolicy {
    /// Returns a copy of this policy with a different input convention.
    #[must_use]
    pub fn with_convention(mut self, convention: InputConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Returns true if `authority_path` is one of the official repository locations.
    #[must_use]
    pub fn is_official_location(&self, authority_path: &str) -> bool {
        let candidate = trim_trailing_slash(authority_path);
        self.official_locations
            .iter()
            .any(|location| trim_trailing_slash(location) == candidate)
    }

    /// Returns true if `fingerprint` names the official signing key.
    #[must_use]
    pub fn is_official_fingerprint(&self, fingerprint: &str) -> bool {
        fingerprint.eq_ignore_ascii_case(&self.official_fingerprint)
    }

    /// Returns true if `authority_path` looks like a repository index location.
    #[must_use]
    pub fn has_repo_shape(&self, authority_path: &str) -> bool {
        let candidate = trim_trailing_slash(authority_path);
        self.repo_path_suffixes
            .iter()
            .any(|suffix| candidate.ends_with(suffix.as_str()))
            || self.is_official_location(candidate)
    }

    /// Custom scheme token for a web scheme.
    #[must_use]
    pub fn custom_scheme_for(&self, scheme: crate::parser::Scheme) -> &str {
        match scheme {
            crate::parser::Scheme::Https => &self.secure_scheme,
            crate::parser::Scheme::Http => &self.insecure_scheme,
        }
    }
}

fn trim_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}
