//! Context-menu entries.

use crate::page::Tab;

pub const ANALYZE_PAGE_ID: &str = "analyze-page";
pub const ANALYZE_LINK_ID: &str = "analyze-link";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuContext {
    Page,
    Selection,
    Link,
}

impl MenuContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuContext::Page => "page",
            MenuContext::Selection => "selection",
            MenuContext::Link => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub contexts: &'static [MenuContext],
}

/// Entries registered when the extension is installed.
pub fn menu_entries() -> [MenuEntry; 2] {
    [
        MenuEntry {
            id: ANALYZE_PAGE_ID,
            title: "Analyze Current Page Agreement",
            contexts: &[MenuContext::Page, MenuContext::Selection],
        },
        MenuEntry {
            id: ANALYZE_LINK_ID,
            title: "Analyze Linked Agreement",
            contexts: &[MenuContext::Link],
        },
    ]
}

/// A click on one of our menu entries.
#[derive(Debug, Clone)]
pub struct MenuClick {
    pub menu_item_id: String,
    pub tab: Tab,
    /// Target of the link under the cursor, present for link clicks.
    pub link_url: Option<String>,
}

impl MenuClick {
    pub fn page(tab: Tab) -> Self {
        Self {
            menu_item_id: ANALYZE_PAGE_ID.to_string(),
            tab,
            link_url: None,
        }
    }

    pub fn link(tab: Tab, url: impl Into<String>) -> Self {
        Self {
            menu_item_id: ANALYZE_LINK_ID.to_string(),
            tab,
            link_url: Some(url.into()),
        }
    }
}
