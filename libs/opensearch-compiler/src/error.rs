//! Error types for opensearch-compiler
//!
//! Compiling requests and responses never fails. Errors only come from
//! parsing engine payloads.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid index mapping: {0}")]
    InvalidMapping(String),
}
