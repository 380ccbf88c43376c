//! Result rendering for Agreement Lens
//!
//! This crate turns an analysis outcome into something a user can read:
//! - Result page (a dedicated tab listening for `displayResult`)
//! - In-page overlay (a modal injected into the analyzed page)
//! - Markdown to HTML, with error text always shown literally

pub mod document;
pub mod escape;
pub mod markdown;
pub mod overlay;
pub mod result_page;

pub use document::{OverlayEvent, PageDocument};
pub use escape::escape_html;
pub use markdown::{MarkdownRenderer, PulldownMarkdown, RenderError};
pub use overlay::{build_overlay, render_html, Role, UiNode, OVERLAY_ID};
pub use result_page::ResultPage;
