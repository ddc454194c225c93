//! HTML fragment presenter for the share page regions.
//!
//! Emits the `err`, `warn`, `info`, `link` and `footer` regions as complete
//! elements on every call. All text and attribute values are escaped.

use std::io::Write;

use anyhow::Result;

use super::{Presenter, RenderResult};

const WELCOME_HTML: &str = "<p>Open a link of the form <code>https://fdroid.link/#https://example.com/fdroid/repo?fingerprint=...</code> to add a repository to F-Droid.</p>";

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Writes the page regions as HTML fragments.
pub struct HtmlPresenter<W: Write> {
    out: W,
}

impl<W: Write> HtmlPresenter<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for HtmlPresenter<W> {
    fn present(&mut self, result: &RenderResult) -> Result<()> {
        let html = render_regions(result);
        self.out.write_all(html.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

fn render_regions(result: &RenderResult) -> String {
    let (errors, warnings, info, link) = if result.has_input {
        (
            render_list("errors", &result.errors),
            render_list("warnings", &result.warnings),
            render_list("info", &result.info_notices),
            render_links(result),
        )
    } else {
        (String::new(), String::new(), String::new(), WELCOME_HTML.to_string())
    };

    format!(
        "<div id=\"err\">{errors}</div>\n<div id=\"warn\">{warnings}</div>\n<div id=\"info\">{info}</div>\n<div id=\"link\">{link}</div>\n<div id=\"footer\">{}</div>\n",
        render_footer()
    )
}

fn render_list(title: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let items: String = entries
        .iter()
        .map(|entry| format!("<li>{}</li>", escape_html(entry)))
        .collect();
    format!("<h2>{title}</h2><ul>{items}</ul>")
}

fn render_links(result: &RenderResult) -> String {
    let Some(links) = &result.links else {
        return String::new();
    };
    [&links.repo_link, &links.http_address, &links.share_link]
        .iter()
        .map(|href| {
            let escaped = escape_html(href);
            format!("<a href=\"{escaped}\">{escaped}</a>")
        })
        .collect::<Vec<_>>()
        .join("<br />")
}

fn render_footer() -> String {
    format!(
        "F-Droid Link ({}), MIT (<a href=\"https://f-droid.org\">f-droid.org</a>)",
        env!("CARGO_PKG_VERSION")
    )
}
