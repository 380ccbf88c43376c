//! Recording browser host for controller tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::page::TabId;
use shared::presentation::DisplayMessage;
use std::collections::{HashMap, HashSet};
use viewers::{PageDocument, ResultPage, UiNode};

use crate::host::{BrowserHost, HostError};

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Alert(String),
    SettingsOpened,
    TabCreated(TabId),
    MessageSent(TabId, DisplayMessage),
    LibraryInjected(TabId, String),
    OverlayShown(TabId),
}

#[derive(Default)]
struct State {
    events: Vec<HostEvent>,
    result_pages: HashMap<TabId, ResultPage>,
    documents: HashMap<TabId, PageDocument>,
    closed: HashSet<TabId>,
    next_tab: u32,
}

pub struct FakeHost {
    state: Mutex<State>,
    fail_tab_creation: bool,
    library_support: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_tab: 100,
                ..Default::default()
            }),
            fail_tab_creation: false,
            library_support: true,
        }
    }

    pub fn failing_tab_creation(mut self) -> Self {
        self.fail_tab_creation = true;
        self
    }

    pub fn without_library_support(mut self) -> Self {
        self.library_support = false;
        self
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.state.lock().events.clone()
    }

    pub fn close_tab(&self, tab: TabId) {
        let mut state = self.state.lock();
        state.closed.insert(tab);
        state.result_pages.remove(&tab);
    }

    pub fn result_page(&self, tab: TabId) -> Option<ResultPageView> {
        let state = self.state.lock();
        state.result_pages.get(&tab).map(|page| ResultPageView {
            loading: page.is_loading(),
            content: page.content_html().map(str::to_string),
        })
    }

    pub fn with_document<T>(&self, tab: TabId, f: impl FnOnce(&mut PageDocument) -> T) -> T {
        let mut state = self.state.lock();
        f(state.documents.entry(tab).or_default())
    }

    fn check_open(state: &State, tab: TabId) -> Result<(), HostError> {
        if state.closed.contains(&tab) {
            Err(HostError::TabClosed(tab))
        } else {
            Ok(())
        }
    }
}

/// Snapshot of a result tab.
pub struct ResultPageView {
    loading: bool,
    content: Option<String>,
}

impl ResultPageView {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn content_html(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[async_trait]
impl BrowserHost for FakeHost {
    async fn alert(&self, message: &str) {
        self.state
            .lock()
            .events
            .push(HostEvent::Alert(message.to_string()));
    }

    async fn open_settings(&self) -> Result<(), HostError> {
        self.state.lock().events.push(HostEvent::SettingsOpened);
        Ok(())
    }

    async fn create_result_tab(&self) -> Result<TabId, HostError> {
        if self.fail_tab_creation {
            return Err(HostError::Platform("tab limit reached".into()));
        }
        let mut state = self.state.lock();
        state.next_tab += 1;
        let tab = TabId(state.next_tab);
        state.result_pages.insert(tab, ResultPage::default());
        state.events.push(HostEvent::TabCreated(tab));
        Ok(tab)
    }

    async fn send_message(&self, tab: TabId, message: &DisplayMessage) -> Result<(), HostError> {
        let mut state = self.state.lock();
        Self::check_open(&state, tab)?;
        let page = state
            .result_pages
            .get_mut(&tab)
            .ok_or(HostError::TabClosed(tab))?;
        page.handle_message(message);
        state
            .events
            .push(HostEvent::MessageSent(tab, message.clone()));
        Ok(())
    }

    async fn inject_library(&self, tab: TabId, name: &str) -> Result<(), HostError> {
        let mut state = self.state.lock();
        Self::check_open(&state, tab)?;
        if !self.library_support {
            return Err(HostError::Platform("script injection blocked".into()));
        }
        if state.documents.entry(tab).or_default().inject_script(name) {
            state
                .events
                .push(HostEvent::LibraryInjected(tab, name.to_string()));
        }
        Ok(())
    }

    async fn show_overlay(&self, tab: TabId, overlay: UiNode) -> Result<(), HostError> {
        let mut state = self.state.lock();
        Self::check_open(&state, tab)?;
        state.documents.entry(tab).or_default().show_overlay(overlay);
        state.events.push(HostEvent::OverlayShown(tab));
        Ok(())
    }
}
