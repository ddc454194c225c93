//! F-Droid Link Core Library
//!
//! Turns a repository reference taken from a share-page location into a
//! validated description of an F-Droid repository, and renders that
//! description as a custom-scheme deep link, a plain web address and a
//! universal share link.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Normalizer, validator and link construction
//! - [`policy`] - Trust allow-list, official fingerprint, scheme and host settings
//! - [`render`] - Display-ready results and the presenters that show them
//! - [`config`] - Optional TOML configuration overriding the policy

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod parser;
pub mod policy;
pub mod render;

// Re-export commonly used types
pub use config::{ConfigError, FileConfig, LoadedConfig};
pub use parser::{
    LinkOutcome, LinkSet, Scheme, Trust, ValidationResult, parse_location, parse_reference,
};
pub use policy::{InputConvention, LinkPolicy};
pub use render::{Presenter, RenderResult};
