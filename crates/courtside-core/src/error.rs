use thiserror::Error;

/// Application-wide error types for courtside.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page or an image).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A CSS selector could not be compiled.
    #[error("Selector error: {0}")]
    SelectorError(String),

    /// Local filesystem operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Writing a table failed.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Invalid run configuration or layout file.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if the error came from talking to the remote site
    /// rather than from local state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::Timeout(_) | AppError::NetworkError(_)
        )
    }
}
