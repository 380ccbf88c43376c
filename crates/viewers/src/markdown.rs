//! Markdown to HTML.

use pulldown_cmark::{html, Event, Options, Parser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Markdown(String),
}

/// Converts a Markdown report into HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// CommonMark renderer with tables, strikethrough, footnotes and task lists.
///
/// Raw HTML embedded in the report is emitted as text, never as markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownMarkdown;

impl MarkdownRenderer for PulldownMarkdown {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_FOOTNOTES);
        opts.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, opts).map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let html = PulldownMarkdown.render("# Title\nBody").unwrap();
        assert_eq!(html, "<h1>Title</h1>\n<p>Body</p>\n");
    }

    #[test]
    fn test_lists_and_emphasis() {
        let html = PulldownMarkdown
            .render("## Red flags\n\n- **Arbitration** clause\n- Data *sharing*\n")
            .unwrap();
        assert!(html.contains("<h2>Red flags</h2>"));
        assert!(html.contains("<li><strong>Arbitration</strong> clause</li>"));
        assert!(html.contains("<em>sharing</em>"));
    }

    #[test]
    fn test_raw_html_is_not_markup() {
        let html = PulldownMarkdown.render("Hi <script>alert(1)</script>").unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_table() {
        let html = PulldownMarkdown
            .render("| Clause | Risk |\n|---|---|\n| 4.2 | High |\n")
            .unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>High</td>"));
    }
}
