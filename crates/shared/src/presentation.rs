//! Where results are shown and the message that carries them there.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOutcome;
use crate::page::TabId;

pub const DISPLAY_RESULT_ACTION: &str = "displayResult";

/// Presentation strategy of a build. Fixed at construction, not chosen per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationStrategy {
    /// Open a result tab up front and message the outcome to it.
    #[default]
    NewTab,
    /// Inject a modal into the tab the click came from.
    InPageOverlay,
}

impl PresentationStrategy {
    pub fn target(self, tab: TabId) -> PresentationTarget {
        match self {
            PresentationStrategy::NewTab => PresentationTarget::NewTab(tab),
            PresentationStrategy::InPageOverlay => PresentationTarget::InPageOverlay(tab),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationTarget {
    NewTab(TabId),
    InPageOverlay(TabId),
}

impl PresentationTarget {
    pub fn tab(&self) -> TabId {
        match self {
            PresentationTarget::NewTab(tab) | PresentationTarget::InPageOverlay(tab) => *tab,
        }
    }
}

/// Message delivered to a result tab's listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub action: String,
    pub data: String,
    pub error: bool,
}

impl DisplayMessage {
    pub fn display_result(outcome: &AnalysisOutcome) -> Self {
        Self {
            action: DISPLAY_RESULT_ACTION.to_string(),
            data: outcome.text().to_string(),
            error: outcome.is_error(),
        }
    }

    pub fn is_display_result(&self) -> bool {
        self.action == DISPLAY_RESULT_ACTION
    }
}
