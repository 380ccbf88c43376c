//! Visible text of local pages.

use async_trait::async_trait;
use html2text::render::text_renderer::TrivialDecorator;
use parking_lot::RwLock;
use shared::page::{ExtractionError, PageTextExtractor, Tab, TabId};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// Wide enough that paragraphs are never re-wrapped.
const TEXT_WIDTH: usize = 10_000;

/// Serves pages backed by files on disk. Each opened file gets its own tab id.
#[derive(Default)]
pub struct FilePageTextExtractor {
    pages: RwLock<HashMap<TabId, PathBuf>>,
}

impl FilePageTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a page as a tab.
    pub fn open(&self, path: impl Into<PathBuf>) -> Tab {
        let path = path.into();
        let mut pages = self.pages.write();
        let id = TabId(pages.keys().map(|t| t.0).max().unwrap_or(0) + 1);
        let url = format!("file://{}", path.display());
        pages.insert(id, path);
        Tab::with_url(id, url)
    }

    pub fn page_path(&self, tab: TabId) -> Option<PathBuf> {
        self.pages.read().get(&tab).cloned()
    }
}

/// Whether a page file holds markup, judged by extension or by a leading `<`.
pub fn is_html(path: &Path, contents: &str) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "html" | "htm" | "xhtml"))
        .unwrap_or(false);
    by_extension || contents.trim_start().starts_with('<')
}

/// Text a reader would see, with markup and scripts removed.
pub fn visible_text(path: &Path, contents: &str) -> String {
    if is_html(path, contents) {
        html2text::from_read_with_decorator(
            contents.as_bytes(),
            TEXT_WIDTH,
            TrivialDecorator::new(),
        )
    } else {
        contents.to_string()
    }
}

#[async_trait]
impl PageTextExtractor for FilePageTextExtractor {
    async fn extract_visible_text(&self, tab: TabId) -> Result<Option<String>, ExtractionError> {
        let path = self
            .page_path(tab)
            .ok_or(ExtractionError::TabUnavailable(tab))?;
        let contents =
            fs::read_to_string(&path).map_err(|e| ExtractionError::Read(e.to_string()))?;
        let text = visible_text(&path, &contents);
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extracts_html_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("terms.html");
        fs::write(
            &path,
            "<html><body><h1>Terms</h1><p>You agree to <b>everything</b>.</p></body></html>",
        )
        .unwrap();

        let extractor = FilePageTextExtractor::new();
        let tab = extractor.open(&path);
        let text = extractor.extract_visible_text(tab.id).await.unwrap().unwrap();
        assert!(text.contains("Terms"));
        assert!(text.contains("You agree to everything."));
        assert!(!text.contains("<b>"));
    }

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("terms.txt");
        fs::write(&path, "Hello world").unwrap();

        let extractor = FilePageTextExtractor::new();
        let tab = extractor.open(&path);
        assert_eq!(
            extractor.extract_visible_text(tab.id).await.unwrap(),
            Some("Hello world".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_page_has_no_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.txt");
        fs::write(&path, "  \n\t").unwrap();

        let extractor = FilePageTextExtractor::new();
        let tab = extractor.open(&path);
        assert_eq!(extractor.extract_visible_text(tab.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_tab() {
        let extractor = FilePageTextExtractor::new();
        let err = extractor.extract_visible_text(TabId(42)).await.unwrap_err();
        assert!(matches!(err, ExtractionError::TabUnavailable(TabId(42))));
    }

    #[test]
    fn test_tabs_get_distinct_ids() {
        let extractor = FilePageTextExtractor::new();
        let a = extractor.open("/tmp/a.html");
        let b = extractor.open("/tmp/b.html");
        assert_ne!(a.id, b.id);
        assert_eq!(extractor.page_path(b.id), Some(PathBuf::from("/tmp/b.html")));
    }
}
