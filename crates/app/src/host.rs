//! Desktop host: result tabs and overlays are HTML files opened in the system browser.

use async_trait::async_trait;
use controller::{BrowserHost, HostError};
use parking_lot::Mutex;
use services::{is_html, FilePageTextExtractor};
use shared::page::TabId;
use shared::presentation::DisplayMessage;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use viewers::{escape_html, PageDocument, PulldownMarkdown, ResultPage, UiNode};

struct ResultTab {
    path: PathBuf,
    page: ResultPage,
}

pub struct DesktopHost {
    pages: Arc<FilePageTextExtractor>,
    out_dir: PathBuf,
    settings_path: PathBuf,
    open_in_browser: bool,
    result_tabs: Mutex<HashMap<TabId, ResultTab>>,
    documents: Mutex<HashMap<TabId, PageDocument>>,
}

impl DesktopHost {
    pub fn new(
        pages: Arc<FilePageTextExtractor>,
        out_dir: PathBuf,
        settings_path: PathBuf,
        open_in_browser: bool,
    ) -> Self {
        Self {
            pages,
            out_dir,
            settings_path,
            open_in_browser,
            result_tabs: Mutex::new(HashMap::new()),
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// `<cache_dir>/agreement_lens/tabs`
    pub fn default_out_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|p| p.join("agreement_lens").join("tabs"))
            .unwrap_or_else(|| PathBuf::from("./agreement_lens_tabs"))
    }

    fn write(&self, path: &Path, html: &str) -> Result<(), HostError> {
        fs::create_dir_all(&self.out_dir).map_err(|e| HostError::Platform(e.to_string()))?;
        fs::write(path, html).map_err(|e| HostError::Platform(e.to_string()))
    }

    fn show(&self, path: &Path) {
        if !self.open_in_browser {
            return;
        }
        if let Err(e) = open::that(path) {
            warn!(path = %path.display(), error = %e, "could not open browser");
        }
    }

    /// Path and contents of the analyzed page behind `tab`.
    fn page_source(&self, tab: TabId) -> Result<(PathBuf, String), HostError> {
        let source = self
            .pages
            .page_path(tab)
            .ok_or(HostError::TabClosed(tab))?;
        let original =
            fs::read_to_string(&source).map_err(|e| HostError::Platform(e.to_string()))?;
        Ok((source, original))
    }
}

/// Insert markup at the end of the page body. Plain-text pages are wrapped in `<pre>`.
pub fn splice_into_body(path: &Path, original: &str, markup: &str) -> String {
    if !is_html(path, original) {
        return format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body><pre>{}</pre>{}</body></html>",
            escape_html(original),
            markup
        );
    }
    match original.to_ascii_lowercase().rfind("</body>") {
        Some(pos) => format!("{}{}{}", &original[..pos], markup, &original[pos..]),
        None => format!("{}{}", original, markup),
    }
}

#[async_trait]
impl BrowserHost for DesktopHost {
    async fn alert(&self, message: &str) {
        eprintln!("\n  {}\n", message);
    }

    async fn open_settings(&self) -> Result<(), HostError> {
        eprintln!(
            "Settings live in {}\nSet your key with: agreement-lens settings set --api-key <KEY>",
            self.settings_path.display()
        );
        Ok(())
    }

    async fn create_result_tab(&self) -> Result<TabId, HostError> {
        let page = ResultPage::new(PulldownMarkdown);
        let stamp = std::process::id();
        let mut tabs = self.result_tabs.lock();
        let path = self
            .out_dir
            .join(format!("result-{}-{}.html", stamp, tabs.len() + 1));
        self.write(&path, &page.to_html())?;
        let tab = self.pages.open(&path).id;
        debug!(%tab, path = %path.display(), "result tab created");
        self.show(&path);
        tabs.insert(tab, ResultTab { path, page });
        Ok(tab)
    }

    async fn send_message(&self, tab: TabId, message: &DisplayMessage) -> Result<(), HostError> {
        let mut tabs = self.result_tabs.lock();
        let result_tab = tabs.get_mut(&tab).ok_or(HostError::TabClosed(tab))?;
        result_tab.page.handle_message(message);
        let html = result_tab.page.to_html();
        self.write(&result_tab.path, &html)?;
        println!("{}", message.data);
        eprintln!("Report written to {}", result_tab.path.display());
        Ok(())
    }

    async fn inject_library(&self, tab: TabId, name: &str) -> Result<(), HostError> {
        if self.pages.page_path(tab).is_none() {
            return Err(HostError::TabClosed(tab));
        }
        let mut documents = self.documents.lock();
        if documents.entry(tab).or_default().inject_script(name) {
            debug!(%tab, library = name, "library injected");
        }
        Ok(())
    }

    async fn show_overlay(&self, tab: TabId, overlay: UiNode) -> Result<(), HostError> {
        // The document only changes once the page behind the tab is readable.
        let (source, original) = self.page_source(tab)?;
        println!("{}", overlay.text_content());
        let body_html = {
            let mut documents = self.documents.lock();
            let document = documents.entry(tab).or_default();
            document.show_overlay(overlay);
            document.body_html()
        };
        let html = splice_into_body(&source, &original, &body_html);
        let path = self.out_dir.join(format!("page-{}-overlay.html", tab));
        self.write(&path, &html)?;
        eprintln!("Page with overlay written to {}", path.display());
        self.show(&path);
        Ok(())
    }
}
