//! Newline-delimited JSON presenter.

use std::io::Write;

use anyhow::{Context, Result};

use super::{Presenter, RenderResult};

/// Writes one JSON document per result, one per line.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, result: &RenderResult) -> Result<()> {
        serde_json::to_writer(&mut self.out, result).context("Failed to serialize result")?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
