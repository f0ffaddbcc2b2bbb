//! Error types for alphashot.

use thiserror::Error;

/// The main error type for capture operations.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No camera or view is available to capture from.
    #[error("no capture source - no active camera or view")]
    NoCaptureSource,

    /// GPU readback did not complete or returned malformed data.
    #[error("readback failed: {0}")]
    ReadbackFailed(String),

    /// A capture request failed validation.
    #[error("invalid capture request: {0}")]
    InvalidRequest(String),

    /// Encoding the final image failed.
    #[error("image encoding failed: {0}")]
    EncodeFailed(String),

    /// A capture sequence is already running.
    ///
    /// The pipeline mutates shared renderer state, so only one capture may
    /// be in flight at a time. Callers must wait for the current run to
    /// finish before issuing another request.
    #[error("a capture is already in progress")]
    CaptureInProgress,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
