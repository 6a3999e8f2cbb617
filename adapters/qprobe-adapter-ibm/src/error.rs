//! Error types for the IBM Quantum adapter.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when talking to IBM Quantum.
#[derive(Debug, Error)]
pub enum IbmError {
    /// No token in the environment and no saved account.
    #[error(
        "IBM Quantum API token not found. Set IBM_QUANTUM_TOKEN or save an account in ~/.qiskit/qiskit-ibm.json."
    )]
    MissingToken,

    /// Token cannot be used as a header value.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// The saved account file could not be used.
    #[error("Account file {path}: {reason}")]
    AccountFile {
        /// File that was read.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Token login was rejected.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error: {message}")]
    ApiError {
        /// Error code from API.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// Backend does not exist in this instance.
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job has no downloadable result.
    #[error("Result not available for job {0}")]
    ResultUnavailable(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<IbmError> for qprobe_hal::HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::MissingToken
            | IbmError::InvalidToken
            | IbmError::LoginFailed(_)
            | IbmError::AccountFile { .. } => {
                qprobe_hal::HalError::AuthenticationFailed(e.to_string())
            }
            IbmError::BackendNotFound(name) => qprobe_hal::HalError::BackendNotFound(name),
            IbmError::JobNotFound(id) => qprobe_hal::HalError::JobNotFound(id),
            IbmError::ResultUnavailable(id) => qprobe_hal::HalError::ResultUnavailable(id),
            IbmError::HttpError(err) => qprobe_hal::HalError::Network(err),
            IbmError::JsonError(err) => qprobe_hal::HalError::Serialization(err),
            IbmError::InvalidParameter(msg) => qprobe_hal::HalError::Configuration(msg),
            IbmError::ApiError { .. } => qprobe_hal::HalError::Backend(e.to_string()),
        }
    }
}
