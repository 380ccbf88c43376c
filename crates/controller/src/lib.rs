//! Menu click orchestration: resolve input and configuration, call the analysis server,
//! and hand the outcome to the presenter.

pub mod host;
pub mod menu;
pub mod presenter;

#[cfg(test)]
mod testing;

pub use host::{BrowserHost, HostError};
pub use menu::{ClickError, ClickReport, MenuController};
pub use presenter::{Delivery, ResultPresenter, MARKDOWN_LIBRARY};
