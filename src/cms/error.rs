//! Content API error types

use thiserror::Error;

/// Errors that can occur when talking to the content API
#[derive(Error, Debug)]
pub enum CmsError {
    /// The API answered 404 for a record or collection
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Content API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

impl CmsError {
    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound(_))
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(err: serde_json::Error) -> Self {
        CmsError::Decode(err.to_string())
    }
}

/// Result type alias for content API operations
pub type CmsResult<T> = Result<T, CmsError>;
