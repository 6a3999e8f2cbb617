//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend does not exist.
    #[error("Backend not found: {0}")]
    BackendNotFound(String),

    /// The requested backend reports that it is not operational.
    #[error("Requested device is not operational: {0}")]
    NotOperational(String),

    /// No backend satisfied the selection filter.
    #[error("Could not get a suitable backend (min. {min_qubits} qubits, operational, non-simulator)")]
    NoSuitableBackend {
        /// Minimum qubit count that was requested.
        min_qubits: u32,
    },

    /// No provider matched the instance filter.
    #[error("No provider matches {0}")]
    ProviderNotFound(String),

    /// More than one provider matched the instance filter.
    #[error("More than one provider matches {filter}: {candidates}")]
    AmbiguousProvider {
        /// The filter as given.
        filter: String,
        /// Matching instances, comma separated.
        candidates: String,
    },

    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// The job has no result to download.
    #[error("Result not available for job {0}")]
    ResultUnavailable(String),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing a report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_operational_display() {
        let err = HalError::NotOperational("ibmqx2".into());
        let msg = err.to_string();
        assert!(msg.contains("not operational"));
        assert!(msg.contains("ibmqx2"));
    }

    #[test]
    fn test_no_suitable_backend_display() {
        let err = HalError::NoSuitableBackend { min_qubits: 5 };
        let msg = err.to_string();
        assert!(msg.contains("suitable backend"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: HalError = io.into();
        assert!(matches!(err, HalError::Io(_)));
    }
}
