//! Crate-wide error types, split by transport layer.

use thiserror::Error;

/// Top-level application error.
///
/// Every poller surfaces exactly one of these when it stops. `Cancelled`
/// and `Closed` are terminal-but-expected: callers treat them as shutdown,
/// not failure.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("WebSocket error: {0}")]
    Ws(#[from] WsError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The cancellation token fired while the task was waiting or sending.
    #[error("cancelled")]
    Cancelled,

    /// The user closed the view with a quit key.
    #[error("closed by user")]
    Closed,
}

impl AppError {
    /// True for the two terminal conditions that are not failures.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, AppError::Cancelled | AppError::Closed)
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// WebSocket errors.
#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Stream closed: {0}")]
    Closed(String),
}
