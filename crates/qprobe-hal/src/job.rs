//! Job handles and result documents.
//!
//! Jobs move through:
//!
//! ```text
//!   Queued ──→ Running ──→ Completed
//!     │           │
//!     │           ├──→ Failed(reason)
//!     │           │
//!     └───────────┴──→ Cancelled
//! ```
//!
//! This crate never submits jobs; it only reads jobs the service already knows.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HalResult;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Job is waiting in queue.
    Queued,
    /// Job is being validated or executed.
    Running,
    /// Job completed successfully.
    Completed,
    /// Job failed with an error message.
    Failed(String),
    /// Job was cancelled.
    Cancelled,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Read-only handle onto a job known to the service.
#[async_trait]
pub trait Job: Send + Sync + fmt::Display {
    /// The job identifier.
    fn job_id(&self) -> &JobId;

    /// Name of the backend the job ran on.
    fn backend_name(&self) -> &str;

    /// When the job was created, if the service reported it.
    fn creation_date(&self) -> Option<DateTime<Utc>>;

    /// Current job status.
    async fn status(&self) -> HalResult<JobStatus>;

    /// The job's result document.
    async fn result(&self) -> HalResult<JobResult>;
}

/// Result document of a job.
///
/// Top-level keys keep the service's order. The per-circuit entries live
/// under `results` and are decoded on demand by [`JobResult::experiments`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobResult(Map<String, Value>);

impl JobResult {
    /// Wrap a raw result dictionary.
    pub fn new(dict: Map<String, Value>) -> Self {
        Self(dict)
    }

    /// The raw dictionary.
    pub fn to_dict(&self) -> &Map<String, Value> {
        &self.0
    }

    /// True when `status` is `"COMPLETED"` and `success` is `true`.
    ///
    /// Counts are only meaningful for such results.
    pub fn is_successful(&self) -> bool {
        self.0.get("status").and_then(Value::as_str) == Some("COMPLETED")
            && self.0.get("success").and_then(Value::as_bool) == Some(true)
    }

    /// Decode the `results` list. Missing `results` yields an empty list.
    pub fn experiments(&self) -> HalResult<Vec<ExperimentResult>> {
        match self.0.get("results") {
            Some(results) => Ok(Vec::<ExperimentResult>::deserialize(results)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Result of one circuit within a job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExperimentResult {
    /// Circuit metadata.
    #[serde(default)]
    pub header: ExperimentHeader,
    /// Measurement data.
    #[serde(default)]
    pub data: ExperimentData,
}

/// Circuit metadata attached to an experiment result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExperimentHeader {
    /// Circuit name.
    #[serde(default)]
    pub name: String,
    /// Total classical bits.
    #[serde(default)]
    pub memory_slots: Option<usize>,
    /// Classical registers as `(name, size)` pairs.
    #[serde(default)]
    pub creg_sizes: Option<Vec<(String, usize)>>,
}

/// Measurement data of an experiment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExperimentData {
    /// Raw counts keyed by hex outcome (e.g. "0x3").
    #[serde(default)]
    pub counts: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_display() {
        assert_eq!(JobStatus::Completed.to_string(), "Completed");
        assert_eq!(
            JobStatus::Failed("timeout".into()).to_string(),
            "Failed: timeout"
        );
    }

    #[test]
    fn test_result_experiments() {
        let json = r#"{
            "backend_name": "ibmq_lima",
            "status": "COMPLETED",
            "success": true,
            "results": [{
                "header": {
                    "name": "bell",
                    "memory_slots": 2,
                    "creg_sizes": [["c", 2]]
                },
                "data": {"counts": {"0x0": 510, "0x3": 514}},
                "shots": 1024,
                "success": true
            }]
        }"#;
        let result: JobResult = serde_json::from_str(json).unwrap();
        let experiments = result.experiments().unwrap();
        assert_eq!(experiments.len(), 1);
        let exp = &experiments[0];
        assert_eq!(exp.header.name, "bell");
        assert_eq!(exp.header.memory_slots, Some(2));
        assert_eq!(exp.header.creg_sizes, Some(vec![("c".to_string(), 2)]));
        assert_eq!(exp.data.counts["0x3"], 514);
    }

    #[test]
    fn test_result_success_needs_both_flags() {
        let result: JobResult =
            serde_json::from_str(r#"{"status": "COMPLETED", "success": true}"#).unwrap();
        assert!(result.is_successful());

        let result: JobResult =
            serde_json::from_str(r#"{"status": "COMPLETED", "success": false}"#).unwrap();
        assert!(!result.is_successful());

        let result: JobResult =
            serde_json::from_str(r#"{"status": "ERROR", "success": true}"#).unwrap();
        assert!(!result.is_successful());

        // A string "true" is not a success flag.
        let result: JobResult =
            serde_json::from_str(r#"{"status": "COMPLETED", "success": "true"}"#).unwrap();
        assert!(!result.is_successful());
        assert!(!JobResult::default().is_successful());
    }

    #[test]
    fn test_result_without_results_key() {
        let result = JobResult::default();
        assert!(result.experiments().unwrap().is_empty());
    }

    #[test]
    fn test_result_with_malformed_results() {
        let result: JobResult = serde_json::from_str(r#"{"results": 3}"#).unwrap();
        assert!(result.experiments().is_err());
    }
}
