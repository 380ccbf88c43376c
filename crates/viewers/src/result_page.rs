//! The dedicated result tab.
//!
//! The page starts with a loading indicator and swaps it for the content element when a
//! `displayResult` message arrives.

use shared::presentation::DisplayMessage;
use tracing::{debug, warn};

use crate::escape::escape_html;
use crate::markdown::{MarkdownRenderer, PulldownMarkdown};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Showing { html: String, error: bool },
}

pub struct ResultPage<R: MarkdownRenderer = PulldownMarkdown> {
    renderer: R,
    state: PageState,
}

impl Default for ResultPage<PulldownMarkdown> {
    fn default() -> Self {
        Self::new(PulldownMarkdown)
    }
}

impl<R: MarkdownRenderer> ResultPage<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: PageState::Loading,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PageState::Loading
    }

    pub fn content_html(&self) -> Option<&str> {
        match &self.state {
            PageState::Loading => None,
            PageState::Showing { html, .. } => Some(html),
        }
    }

    /// Message listener. Returns whether the message was handled.
    pub fn handle_message(&mut self, msg: &DisplayMessage) -> bool {
        if !msg.is_display_result() {
            debug!(action = %msg.action, "ignoring message");
            return false;
        }
        self.state = PageState::Showing {
            html: render_content(&self.renderer, msg),
            error: msg.error,
        };
        true
    }

    /// The complete page in its current state.
    pub fn to_html(&self) -> String {
        let (loading_display, content_display, content) = match &self.state {
            PageState::Loading => ("block", "none", ""),
            PageState::Showing { html, .. } => ("none", "block", html.as_str()),
        };
        RESULT_PAGE_TEMPLATE
            .replace("{loading_display}", loading_display)
            .replace("{content_display}", content_display)
            .replace("{content}", content)
    }
}

/// HTML for the content element.
pub fn render_content(renderer: &dyn MarkdownRenderer, msg: &DisplayMessage) -> String {
    if msg.error {
        return format!(
            "<div class=\"error\"><h3>Analysis Failed</h3><p>{}</p></div>",
            escape_html(&msg.data)
        );
    }
    match renderer.render(&msg.data) {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "markdown rendering failed");
            format!(
                "<div class=\"error\">Error parsing markdown result: {}</div>",
                escape_html(&e.to_string())
            )
        }
    }
}

const RESULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Agreement Analysis</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 860px; margin: 40px auto; padding: 0 20px; line-height: 1.6; color: #222; }
  #loading { text-align: center; margin-top: 120px; color: #666; }
  .error { background: #fdecea; border: 1px solid #f5c2c0; color: #b00020; padding: 16px; border-radius: 8px; }
  table { border-collapse: collapse; }
  th, td { border: 1px solid #ddd; padding: 6px 10px; }
  code { background: #f4f4f4; padding: 1px 4px; border-radius: 4px; }
</style>
</head>
<body>
<div id="loading" style="display:{loading_display}">Analyzing agreement, please wait...</div>
<div id="content" style="display:{content_display}">{content}</div>
</body>
</html>
"#;
