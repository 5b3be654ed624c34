use thiserror::Error;

/// Failures talking to the bot backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent or the body could not be decoded.
    #[error("Request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status code.
    #[error("Backend returned {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    /// The configured base URL cannot be used to build request URLs.
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The backend could not be reached at all.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
