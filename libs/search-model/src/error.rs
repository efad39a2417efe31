//! Error types for search-model

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid geo point '{0}': expected \"latitude,longitude\"")]
    InvalidGeoPoint(String),
}
