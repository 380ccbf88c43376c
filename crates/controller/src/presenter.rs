//! Shows an analysis outcome on the build's presentation surface.

use std::sync::Arc;

use shared::analysis::AnalysisOutcome;
use shared::page::TabId;
use shared::presentation::{DisplayMessage, PresentationStrategy, PresentationTarget};
use tracing::{debug, info, warn};
use viewers::{build_overlay, MarkdownRenderer, PulldownMarkdown};

use crate::host::{BrowserHost, HostError};

/// Library the overlay needs for Markdown rendering inside the page.
pub const MARKDOWN_LIBRARY: &str = "markdown-renderer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The destination went away; the result was discarded.
    Dropped,
}

pub struct ResultPresenter {
    host: Arc<dyn BrowserHost>,
    strategy: PresentationStrategy,
    markdown: Arc<dyn MarkdownRenderer>,
}

impl ResultPresenter {
    pub fn new(host: Arc<dyn BrowserHost>, strategy: PresentationStrategy) -> Self {
        Self {
            host,
            strategy,
            markdown: Arc::new(PulldownMarkdown),
        }
    }

    pub fn with_markdown(mut self, markdown: Arc<dyn MarkdownRenderer>) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn strategy(&self) -> PresentationStrategy {
        self.strategy
    }

    /// Pick the destination before the request goes out. For the new-tab strategy this
    /// opens the result tab, so a failure here means no request should be sent.
    pub async fn prepare(&self, source: TabId) -> Result<PresentationTarget, HostError> {
        match self.strategy {
            PresentationStrategy::NewTab => {
                let tab = self.host.create_result_tab().await?;
                debug!(%tab, "opened result tab");
                Ok(PresentationTarget::NewTab(tab))
            }
            PresentationStrategy::InPageOverlay => Ok(PresentationTarget::InPageOverlay(source)),
        }
    }

    pub async fn present(&self, outcome: &AnalysisOutcome, target: PresentationTarget) -> Delivery {
        let result = match target {
            PresentationTarget::NewTab(tab) => {
                let message = DisplayMessage::display_result(outcome);
                self.host.send_message(tab, &message).await
            }
            PresentationTarget::InPageOverlay(tab) => self.show_overlay(outcome, tab).await,
        };
        match result {
            Ok(()) => {
                info!(tab = %target.tab(), error = outcome.is_error(), "result presented");
                Delivery::Delivered
            }
            Err(e) => {
                warn!(tab = %target.tab(), error = %e, "result dropped");
                Delivery::Dropped
            }
        }
    }

    async fn show_overlay(&self, outcome: &AnalysisOutcome, tab: TabId) -> Result<(), HostError> {
        let markdown = match self.host.inject_library(tab, MARKDOWN_LIBRARY).await {
            Ok(()) => Some(self.markdown.as_ref()),
            Err(HostError::TabClosed(tab)) => return Err(HostError::TabClosed(tab)),
            Err(e) => {
                debug!(%tab, error = %e, "markdown renderer unavailable, showing plain text");
                None
            }
        };
        let overlay = build_overlay(outcome.text(), outcome.is_error(), markdown);
        self.host.show_overlay(tab, overlay).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHost, HostEvent};
    use viewers::{Role, OVERLAY_ID};

    #[tokio::test]
    async fn test_new_tab_prepare_and_present() {
        let host = Arc::new(FakeHost::new());
        let presenter = ResultPresenter::new(host.clone(), PresentationStrategy::NewTab);

        let target = presenter.prepare(TabId(1)).await.unwrap();
        let PresentationTarget::NewTab(tab) = target else {
            panic!("expected a new tab target");
        };
        assert_ne!(tab, TabId(1));
        assert!(host.result_page(tab).unwrap().is_loading());

        let delivery = presenter
            .present(&AnalysisOutcome::Success("**ok**".into()), target)
            .await;
        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(
            host.result_page(tab).unwrap().content_html(),
            Some("<p><strong>ok</strong></p>\n")
        );
    }

    #[tokio::test]
    async fn test_closed_tab_drops_result() {
        let host = Arc::new(FakeHost::new());
        let presenter = ResultPresenter::new(host.clone(), PresentationStrategy::NewTab);
        let target = presenter.prepare(TabId(1)).await.unwrap();
        host.close_tab(target.tab());

        let delivery = presenter
            .present(&AnalysisOutcome::Success("late".into()), target)
            .await;
        assert_eq!(delivery, Delivery::Dropped);
    }

    #[tokio::test]
    async fn test_overlay_injects_library_once() {
        let host = Arc::new(FakeHost::new());
        let presenter = ResultPresenter::new(host.clone(), PresentationStrategy::InPageOverlay);
        let target = presenter.prepare(TabId(3)).await.unwrap();
        assert_eq!(target, PresentationTarget::InPageOverlay(TabId(3)));

        presenter.present(&AnalysisOutcome::Success("# One".into()), target).await;
        presenter.present(&AnalysisOutcome::Success("# Two".into()), target).await;

        let injections = host
            .events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::LibraryInjected(..)))
            .count();
        assert_eq!(injections, 1);

        host.with_document(TabId(3), |doc| {
            assert_eq!(doc.element_count(OVERLAY_ID), 1);
            let body = doc.overlay().unwrap().find(Role::Body).unwrap();
            assert!(body.text_content().contains("<h1>Two</h1>"));
        });
    }

    #[tokio::test]
    async fn test_overlay_without_renderer_shows_plain_text() {
        let host = Arc::new(FakeHost::new().without_library_support());
        let presenter = ResultPresenter::new(host.clone(), PresentationStrategy::InPageOverlay);
        let target = presenter.prepare(TabId(3)).await.unwrap();

        let delivery = presenter
            .present(&AnalysisOutcome::Success("# Title".into()), target)
            .await;
        assert_eq!(delivery, Delivery::Delivered);
        host.with_document(TabId(3), |doc| {
            let body = doc.overlay().unwrap().find(Role::Body).unwrap();
            assert_eq!(body.text_content(), "# Title");
        });
    }
}
