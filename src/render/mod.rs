//! Rendering sink: the structured result handed to presenters.
//!
//! The pipeline never writes output itself. It produces a [`RenderResult`]
//! and hands it to a [`Presenter`]; presenters re-render every region on each
//! call, so presenting the same result twice gives the same output.

mod html;
mod json;
mod text;

pub use html::{HtmlPresenter, escape_html};
pub use json::JsonPresenter;
pub use text::TextPresenter;

use serde::Serialize;

use crate::parser::{LinkOutcome, LinkSet, Trust};

/// Display-ready result of one pipeline run.
///
/// `links` is present iff `has_input` is true and `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub has_input: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info_notices: Vec<String>,
    pub links: Option<LinkSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust: Option<Trust>,
    /// Package id from a legacy reference, percent-encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl RenderResult {
    /// Result for a run that had nothing to parse.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            has_input: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            info_notices: Vec::new(),
            links: None,
            trust: None,
            package: None,
        }
    }
}

impl From<&LinkOutcome> for RenderResult {
    fn from(outcome: &LinkOutcome) -> Self {
        match outcome {
            LinkOutcome::NoInput => Self::empty(),
            LinkOutcome::Unparseable(e) => Self {
                has_input: true,
                errors: vec![e.to_string()],
                ..Self::empty()
            },
            LinkOutcome::Validated { result, links } => Self {
                has_input: true,
                errors: result.errors.iter().map(ToString::to_string).collect(),
                warnings: result.warnings.iter().map(ToString::to_string).collect(),
                info_notices: result.info_notices.iter().map(ToString::to_string).collect(),
                links: links.clone(),
                trust: result.trust,
                package: result
                    .package
                    .as_deref()
                    .map(|package| urlencoding::encode(package).into_owned()),
            },
        }
    }
}

/// Capability the pipeline calls to show a result.
pub trait Presenter {
    /// Shows `result`, replacing whatever the previous call showed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn present(&mut self, result: &RenderResult) -> anyhow::Result<()>;
}

/// Presenter that keeps every result it receives; useful in tests and embedding.
#[derive(Debug, Default)]
pub struct CollectingPresenter {
    pub results: Vec<RenderResult>,
}

impl CollectingPresenter {
    /// The most recently presented result.
    #[must_use]
    pub fn latest(&self) -> Option<&RenderResult> {
        self.results.last()
    }
}

impl Presenter for CollectingPresenter {
    fn present(&mut self, result: &RenderResult) -> anyhow::Result<()> {
        self.results.push(result.clone());
        Ok(())
    }
}
