//! Context-menu registration and click handling.

use std::sync::Arc;

use providers::AnalysisClient;
use shared::analysis::{AnalysisInput, AnalysisOutcome};
use shared::menu::{menu_entries, MenuClick, MenuEntry, ANALYZE_LINK_ID, ANALYZE_PAGE_ID};
use shared::page::{PageTextExtractor, TabId};
use shared::presentation::PresentationTarget;
use shared::settings::{SettingsError, SettingsStore};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::host::BrowserHost;
use crate::presenter::{Delivery, ResultPresenter};

pub const MISSING_KEY_NOTICE: &str = "Please set your Gemini API Key in the extension settings.";
pub const MISSING_LINK_MESSAGE: &str = "The clicked link has no target URL.";

/// How a click episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickReport {
    Presented(PresentationTarget),
    /// The outcome arrived but its destination was gone.
    Dropped(PresentationTarget),
    /// No API key configured; the user was sent to settings.
    AbortedMissingKey,
    /// The page yielded no text. Nothing is shown to the user.
    AbortedNoText,
    /// The result tab could not be opened, so no request was sent.
    AbortedNoTab,
}

#[derive(Debug, Error)]
pub enum ClickError {
    #[error("could not read settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("unknown menu item \"{0}\"")]
    UnknownMenuItem(String),
}

pub struct MenuController {
    settings: Arc<dyn SettingsStore>,
    extractor: Arc<dyn PageTextExtractor>,
    client: Arc<AnalysisClient>,
    host: Arc<dyn BrowserHost>,
    presenter: ResultPresenter,
}

impl MenuController {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        extractor: Arc<dyn PageTextExtractor>,
        client: Arc<AnalysisClient>,
        host: Arc<dyn BrowserHost>,
        presenter: ResultPresenter,
    ) -> Self {
        Self {
            settings,
            extractor,
            client,
            host,
            presenter,
        }
    }

    /// Entries to install when the extension is set up.
    pub fn register_menus(&self) -> [MenuEntry; 2] {
        let entries = menu_entries();
        for entry in &entries {
            info!(id = entry.id, title = entry.title, "registered menu entry");
        }
        entries
    }

    /// Run a click on its own task. Clicks are not ordered or deduplicated.
    pub fn spawn_click(
        self: &Arc<Self>,
        click: MenuClick,
    ) -> JoinHandle<Result<ClickReport, ClickError>> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.handle_click(click).await })
    }

    pub async fn handle_click(&self, click: MenuClick) -> Result<ClickReport, ClickError> {
        let span = info_span!(
            "menu_click",
            click_id = %Uuid::new_v4(),
            item = %click.menu_item_id,
            tab = %click.tab.id
        );
        async move {
            let report = self.dispatch(click).await;
            match &report {
                Ok(report) => info!(?report, "click handled"),
                Err(e) => error!(error = %e, "click failed"),
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, click: MenuClick) -> Result<ClickReport, ClickError> {
        // Validate the menu item before touching storage.
        let is_link = match click.menu_item_id.as_str() {
            ANALYZE_LINK_ID => true,
            ANALYZE_PAGE_ID => false,
            other => return Err(ClickError::UnknownMenuItem(other.to_string())),
        };

        let config = self.settings.get().await?;
        if !config.has_api_key() {
            warn!("no API key configured");
            self.host.alert(MISSING_KEY_NOTICE).await;
            if let Err(e) = self.host.open_settings().await {
                warn!(error = %e, "could not open settings");
            }
            return Ok(ClickReport::AbortedMissingKey);
        }

        // Links go to the server untouched; it reports unusable URLs itself.
        let input = if is_link {
            match click.link_url.filter(|link| !link.is_empty()) {
                Some(link) => Ok(AnalysisInput::Url(link)),
                None => {
                    warn!("link click without a target URL");
                    Err(MISSING_LINK_MESSAGE)
                }
            }
        } else {
            match self.page_text(click.tab.id).await {
                Some(text) => Ok(AnalysisInput::Text(text)),
                None => return Ok(ClickReport::AbortedNoText),
            }
        };

        let target = match self.presenter.prepare(click.tab.id).await {
            Ok(target) => target,
            Err(e) => {
                error!(error = %e, "failed to create result tab");
                return Ok(ClickReport::AbortedNoTab);
            }
        };

        let outcome = match input {
            Ok(input) => self.client.analyze(&config, &input).await,
            Err(message) => AnalysisOutcome::Failure(message.to_string()),
        };
        Ok(match self.presenter.present(&outcome, target).await {
            Delivery::Delivered => ClickReport::Presented(target),
            Delivery::Dropped => ClickReport::Dropped(target),
        })
    }

    async fn page_text(&self, tab: TabId) -> Option<String> {
        match self.extractor.extract_visible_text(tab).await {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                warn!("page produced no text, nothing to analyze");
                None
            }
            Err(e) => {
                warn!(error = %e, "page text extraction failed");
                None
            }
        }
    }
}
