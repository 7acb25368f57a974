//! Crate-wide error type for import, configuration and export paths
//!
//! The computation engine itself is total and never returns these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV must include columns: {0}")]
    MissingColumns(&'static str),

    #[error("Invalid period '{value}': expected YYYY-MM-DD")]
    InvalidPeriod { value: String },

    #[error("Unknown canonical category '{0}'")]
    UnknownCategory(String),

    #[error("Category '{source_account}' missing mapping to canonical schema")]
    MappingRequired { source_account: String },

    #[error("Unmapped accounts present: {}", .0.join(", "))]
    UnmappedAccounts(Vec<String>),
}

pub type Result<T> = std::result::Result<T, EngineError>;
