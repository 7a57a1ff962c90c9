pub mod config;
pub mod core;
pub mod models;
pub mod prompt;
pub mod report;
pub mod scraper;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::core::pipeline::{AnalysisReport, ValuationPipeline};
pub use crate::scraper::FetchError;
pub use crate::utils::error::{AppError, Result};
