//! Platform collaborators: persistent settings and page text extraction.

pub mod page_text;
pub mod settings_store;

pub use page_text::{is_html, FilePageTextExtractor};
pub use settings_store::{JsonSettingsStore, MemorySettingsStore};
