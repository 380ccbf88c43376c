//! Browser tabs and the page-text collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tab a menu click came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub url: Option<String>,
}

impl Tab {
    pub fn new(id: TabId) -> Self {
        Self { id, url: None }
    }

    pub fn with_url(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("tab {0} is not available")]
    TabUnavailable(TabId),
    #[error("could not read page content: {0}")]
    Read(String),
}

/// Reads the visible text of a page without modifying it.
#[async_trait]
pub trait PageTextExtractor: Send + Sync {
    /// `Ok(None)` means the page produced no text.
    async fn extract_visible_text(&self, tab: TabId) -> Result<Option<String>, ExtractionError>;
}
