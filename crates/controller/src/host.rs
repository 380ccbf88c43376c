//! The browser surface the controller drives.

use async_trait::async_trait;
use shared::page::TabId;
use shared::presentation::DisplayMessage;
use thiserror::Error;
use viewers::UiNode;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("tab {0} is closed")]
    TabClosed(TabId),
    #[error("{0}")]
    Platform(String),
}

#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Blocking notice shown to the user.
    async fn alert(&self, message: &str);

    /// Navigate to the settings surface.
    async fn open_settings(&self) -> Result<(), HostError>;

    /// Open a result tab showing its loading state.
    async fn create_result_tab(&self) -> Result<TabId, HostError>;

    /// Deliver a message to a tab's listener.
    async fn send_message(&self, tab: TabId, message: &DisplayMessage) -> Result<(), HostError>;

    /// Inject a script library into a page. Injecting a library twice is a no-op.
    async fn inject_library(&self, tab: TabId, name: &str) -> Result<(), HostError>;

    /// Insert the overlay into a page, replacing an existing one.
    async fn show_overlay(&self, tab: TabId, overlay: UiNode) -> Result<(), HostError>;
}
