//! Optional TOML configuration overriding the built-in link policy.
//!
//! Keys are flat and all optional:
//!
//! ```toml
//! convention = "fragment"          # or "legacy-query"
//! share_host = "fdroid.link"
//! secure_scheme = "fdroidrepos"
//! insecure_scheme = "fdroidrepo"
//! official_fingerprint = "43238D51..."
//! official_locations = ["f-droid.org/repo", "f-droid.org/archive"]
//! repo_path_suffixes = ["/fdroid/repo", "/fdroid/archive"]
//! ```

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::parser::is_valid_fingerprint;
use crate::policy::{InputConvention, LinkPolicy};

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config syntax: {0}")]
    Syntax(#[from] toml::de::Error),

    #[error("Invalid config value for `{key}`: {value}. Expected: {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, expected: &'static str) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            expected,
        }
    }
}

/// Values read from the config file; `None` keeps the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub convention: Option<InputConvention>,
    pub share_host: Option<String>,
    pub secure_scheme: Option<String>,
    pub insecure_scheme: Option<String>,
    pub official_fingerprint: Option<String>,
    pub official_locations: Option<Vec<String>>,
    pub repo_path_suffixes: Option<Vec<String>>,
}

impl FileConfig {
    /// Parses and validates config text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Syntax`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates config values against what the pipeline can use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fingerprint) = &self.official_fingerprint
            && !is_valid_fingerprint(fingerprint)
        {
            return Err(ConfigError::invalid(
                "official_fingerprint",
                fingerprint,
                "64 hexadecimal characters",
            ));
        }

        validate_scheme_token("secure_scheme", self.secure_scheme.as_deref())?;
        validate_scheme_token("insecure_scheme", self.insecure_scheme.as_deref())?;
        if let (Some(secure), Some(insecure)) = (&self.secure_scheme, &self.insecure_scheme)
            && secure.eq_ignore_ascii_case(insecure)
        {
            return Err(ConfigError::invalid(
                "insecure_scheme",
                insecure,
                "a token different from `secure_scheme`",
            ));
        }

        if let Some(host) = &self.share_host
            && (host.is_empty() || host.contains(['/', '#', '?', ' ']))
        {
            return Err(ConfigError::invalid(
                "share_host",
                host,
                "a bare host name such as fdroid.link",
            ));
        }

        if let Some(locations) = &self.official_locations
            && let Some(bad) = locations
                .iter()
                .find(|location| location.is_empty() || location.contains("://"))
        {
            return Err(ConfigError::invalid(
                "official_locations",
                bad,
                "host/path entries without a scheme",
            ));
        }

        if let Some(suffixes) = &self.repo_path_suffixes
            && let Some(bad) = suffixes.iter().find(|suffix| !suffix.starts_with('/'))
        {
            return Err(ConfigError::invalid(
                "repo_path_suffixes",
                bad,
                "paths starting with '/'",
            ));
        }

        Ok(())
    }

    /// Overlays the configured values on `policy`.
    #[must_use]
    pub fn apply(&self, mut policy: LinkPolicy) -> LinkPolicy {
        if let Some(convention) = self.convention {
            policy.convention = convention;
        }
        if let Some(host) = &self.share_host {
            policy.share_host.clone_from(host);
        }
        if let Some(scheme) = &self.secure_scheme {
            policy.secure_scheme.clone_from(scheme);
        }
        if let Some(scheme) = &self.insecure_scheme {
            policy.insecure_scheme.clone_from(scheme);
        }
        if let Some(fingerprint) = &self.official_fingerprint {
            policy.official_fingerprint = fingerprint.to_ascii_uppercase();
        }
        if let Some(locations) = &self.official_locations {
            policy.official_locations.clone_from(locations);
        }
        if let Some(suffixes) = &self.repo_path_suffixes {
            policy.repo_path_suffixes.clone_from(suffixes);
        }
        policy
    }
}

fn validate_scheme_token(key: &'static str, value: Option<&str>) -> Result<(), ConfigError> {
    let Some(token) = value else {
        return Ok(());
    };
    let well_formed = token.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !well_formed
        || token.eq_ignore_ascii_case("http")
        || token.eq_ignore_ascii_case("https")
    {
        return Err(ConfigError::invalid(
            key,
            token,
            "a URI scheme token other than http/https",
        ));
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

impl LoadedConfig {
    /// Builds the effective policy: defaults, then file values.
    #[must_use]
    pub fn policy(&self) -> LinkPolicy {
        match &self.config {
            Some(config) => config.apply(LinkPolicy::default()),
            None => LinkPolicy::default(),
        }
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/fdroid-link/config.toml`
/// 2. `$HOME/.config/fdroid-link/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    resolve_config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn resolve_config_path_from(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("fdroid-link")
                .join("config.toml"),
        );
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("fdroid-link")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or is invalid.
pub fn load_default_file_config() -> Result<LoadedConfig, ConfigError> {
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_config_at(&path),
        path => Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        }),
    }
}

/// Loads config from an explicit path; the file must exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or is invalid.
pub fn load_config_at(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = FileConfig::from_toml(&raw)?;
    debug!(path = %path.display(), "config file loaded");
    Ok(LoadedConfig {
        path: Some(path.to_path_buf()),
        config: Some(config),
        loaded_from_file: true,
    })
}
