//! Error types for the dss_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dss_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Disease knowledge base validation error
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// Malformed collaborator data (symptoms, metrics, profile files)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single rule failed to evaluate
    #[error("Rule evaluation error: {0}")]
    Rule(String),
}
