//! Client for the remote agreement analysis service.

pub mod analysis;

pub use analysis::{AnalysisClient, AnalysisError, DEFAULT_SERVER_URL};
