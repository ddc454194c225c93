//! Plain-text presenter for terminals.

use std::io::Write;

use anyhow::Result;

use super::{Presenter, RenderResult};

/// Shown when there is no reference to parse.
pub const WELCOME_TEXT: &str = "No repository reference given. Pass one as an argument or pipe locations via stdin.\nExample: fdroid-link 'https://f-droid.org/repo'";

/// Writes results as labelled sections.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_section(&mut self, title: &str, entries: &[String]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{title}:")?;
        for entry in entries {
            writeln!(self.out, "  - {}", single_line(entry))?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, result: &RenderResult) -> Result<()> {
        if !result.has_input {
            writeln!(self.out, "{WELCOME_TEXT}")?;
            self.out.flush()?;
            return Ok(());
        }

        self.write_section("errors", &result.errors)?;
        self.write_section("warnings", &result.warnings)?;
        self.write_section("info", &result.info_notices)?;

        if let Some(trust) = result.trust {
            writeln!(self.out, "trust:       {trust}")?;
        }
        if let Some(package) = &result.package {
            writeln!(self.out, "package:     {package}")?;
        }
        if let Some(links) = &result.links {
            writeln!(self.out, "repo link:   {}", links.repo_link)?;
            writeln!(self.out, "web address: {}", links.http_address)?;
            writeln!(self.out, "share link:  {}", links.share_link)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps control characters from the input out of the terminal.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
