//! Backend trait and the dictionaries a backend exposes.
//!
//! A [`Backend`] is a read-only handle onto a device or simulator owned by
//! the service:
//!
//! ```text
//!   configuration() ──→ status() ──→ properties() ──→ jobs() / retrieve_job()
//!    (sync, &ref)       (async)       (async)           (async)
//! ```
//!
//! `configuration()` is synchronous and infallible. Handles are created from
//! the configuration the service returned, so it is always at hand.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HalResult;
use crate::instance::Instance;
use crate::job::{Job, JobId};

/// Name of the local shot-based simulator.
pub const QASM_SIMULATOR: &str = "qasm_simulator";

/// Name of the local statevector simulator.
pub const STATEVECTOR_SIMULATOR: &str = "statevector_simulator";

/// Name of the local unitary simulator.
pub const UNITARY_SIMULATOR: &str = "unitary_simulator";

/// The fixed set of local simulators, in listing order.
pub const LOCAL_SIMULATORS: [&str; 3] = [STATEVECTOR_SIMULATOR, UNITARY_SIMULATOR, QASM_SIMULATOR];

/// Name of the cloud-hosted simulator.
pub const CLOUD_SIMULATOR: &str = "ibmq_qasm_simulator";

/// Operational status of a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    /// Backend name.
    pub backend_name: String,
    /// Backend version string.
    pub backend_version: String,
    /// Whether the backend accepts jobs.
    pub operational: bool,
    /// Jobs waiting in the backend queue.
    pub pending_jobs: u32,
    /// Free-form status message (e.g. "active", "maintenance").
    pub status_msg: String,
}

impl BackendStatus {
    /// Status of a backend that is always up with an empty queue.
    pub fn always_operational(
        backend_name: impl Into<String>,
        backend_version: impl Into<String>,
    ) -> Self {
        Self {
            backend_name: backend_name.into(),
            backend_version: backend_version.into(),
            operational: true,
            pending_jobs: 0,
            status_msg: String::new(),
        }
    }

    /// Key/value view in field order.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut dict = Map::new();
        dict.insert("backend_name".into(), Value::from(self.backend_name.clone()));
        dict.insert(
            "backend_version".into(),
            Value::from(self.backend_version.clone()),
        );
        dict.insert("operational".into(), Value::from(self.operational));
        dict.insert("pending_jobs".into(), Value::from(self.pending_jobs));
        dict.insert("status_msg".into(), Value::from(self.status_msg.clone()));
        dict
    }
}

/// Static configuration of a backend, as reported by the service.
///
/// Keys keep the order the service sent them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendConfiguration(Map<String, Value>);

impl BackendConfiguration {
    /// Wrap a raw configuration dictionary.
    pub fn new(dict: Map<String, Value>) -> Self {
        Self(dict)
    }

    /// The raw dictionary.
    pub fn to_dict(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `backend_name`, or empty if absent.
    pub fn backend_name(&self) -> &str {
        self.0
            .get("backend_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// `n_qubits`, or 0 if absent.
    pub fn n_qubits(&self) -> u32 {
        self.0
            .get("n_qubits")
            .and_then(Value::as_u64)
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
    }

    /// `simulator`, or false if absent.
    pub fn simulator(&self) -> bool {
        self.0
            .get("simulator")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// `basis_gates`, skipping non-string entries.
    pub fn basis_gates(&self) -> Vec<&str> {
        self.0
            .get("basis_gates")
            .and_then(Value::as_array)
            .map(|gates| gates.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Calibration data of a backend (gate errors, qubit T1/T2, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendProperties(Map<String, Value>);

impl BackendProperties {
    /// Wrap a raw properties dictionary.
    pub fn new(dict: Map<String, Value>) -> Self {
        Self(dict)
    }

    /// The raw dictionary.
    pub fn to_dict(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether the service sent an empty document.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read-only handle onto a quantum backend.
#[async_trait]
pub trait Backend: Send + Sync + fmt::Display {
    /// Backend name (e.g. "ibmq_lima").
    fn name(&self) -> &str;

    /// Human-readable name of the provider this handle came from.
    fn provider_name(&self) -> String;

    /// Provider instance, for cloud backends.
    fn instance(&self) -> Option<&Instance> {
        None
    }

    /// Backend configuration, cached when the handle was created.
    fn configuration(&self) -> &BackendConfiguration;

    /// Current operational status and queue length.
    async fn status(&self) -> HalResult<BackendStatus>;

    /// Latest calibration data, if the backend publishes any.
    async fn properties(&self) -> HalResult<Option<BackendProperties>>;

    /// Recent jobs run on this backend, newest first.
    async fn jobs(&self) -> HalResult<Vec<Box<dyn Job>>>;

    /// Fetch a single job by ID.
    async fn retrieve_job(&self, job_id: &JobId) -> HalResult<Box<dyn Job>>;
}
