//! In-memory providers, backends and jobs for unit tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value, json};

use qprobe_hal::{
    Backend, BackendConfiguration, BackendProperties, BackendStatus, HalError, HalResult,
    Instance, InstanceFilter, Job, JobId, JobResult, JobStatus, Provider, QuantumService,
};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(Clone)]
pub struct FakeJob {
    id: JobId,
    backend: String,
    status: JobStatus,
    created: Option<DateTime<Utc>>,
    result: JobResult,
}

impl FakeJob {
    /// A successful two-circuit job.
    pub fn completed(id: &str, backend: &str) -> Self {
        Self::with_result(id, backend, "COMPLETED", true)
    }

    pub fn with_result(id: &str, backend: &str, status: &str, success: bool) -> Self {
        let result = object(json!({
            "backend_name": backend,
            "job_id": id,
            "status": status,
            "success": success,
            "results": [
                {
                    "header": {"name": "bell", "memory_slots": 2, "creg_sizes": [["c", 2]]},
                    "data": {"counts": {"0x0": 510, "0x3": 514}},
                    "shots": 1024,
                    "success": true
                },
                {
                    "header": {"name": "flip", "memory_slots": 1},
                    "data": {"counts": {"0x1": 1024}},
                    "shots": 1024,
                    "success": true
                }
            ]
        }));
        let job_status = if status == "COMPLETED" {
            JobStatus::Completed
        } else {
            JobStatus::Failed(status.to_string())
        };
        Self {
            id: JobId::new(id),
            backend: backend.to_string(),
            status: job_status,
            created: Utc.with_ymd_and_hms(2021, 3, 1, 10, 15, 30).single(),
            result: JobResult::new(result),
        }
    }
}

impl fmt::Display for FakeJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FakeJob({})", self.id)
    }
}

#[async_trait]
impl Job for FakeJob {
    fn job_id(&self) -> &JobId {
        &self.id
    }

    fn backend_name(&self) -> &str {
        &self.backend
    }

    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    async fn status(&self) -> HalResult<JobStatus> {
        Ok(self.status.clone())
    }

    async fn result(&self) -> HalResult<JobResult> {
        Ok(self.result.clone())
    }
}

pub struct FakeBackend {
    instance: Instance,
    configuration: BackendConfiguration,
    status: BackendStatus,
    properties: Option<BackendProperties>,
    jobs: Vec<FakeJob>,
    failing_status: bool,
}

impl FakeBackend {
    /// A device in `ibm-q/open/main`.
    pub fn device(name: &str, n_qubits: u32, pending_jobs: u32, operational: bool) -> Self {
        Self::build(name, n_qubits, pending_jobs, operational, false)
    }

    pub fn simulator(name: &str, n_qubits: u32) -> Self {
        Self::build(name, n_qubits, 0, true, true)
    }

    fn build(name: &str, n_qubits: u32, pending: u32, operational: bool, simulator: bool) -> Self {
        let configuration = BackendConfiguration::new(object(json!({
            "backend_name": name,
            "backend_version": "1.0.0",
            "n_qubits": n_qubits,
            "basis_gates": ["id", "rz", "sx", "x", "cx"],
            "gates": [{"name": "cx", "parameters": [], "coupling_map": [[0, 1]]}],
            "simulator": simulator,
            "coupling_map": [[0, 1], [1, 0]],
        })));
        Self {
            instance: Instance::new("ibm-q", "open", "main"),
            configuration,
            status: BackendStatus {
                backend_name: name.to_string(),
                backend_version: "1.0.0".to_string(),
                operational,
                pending_jobs: pending,
                status_msg: if operational { "active" } else { "maintenance" }.to_string(),
            },
            properties: None,
            jobs: Vec::new(),
            failing_status: false,
        }
    }

    pub fn with_properties(mut self) -> Self {
        self.properties = Some(BackendProperties::new(object(json!({
            "backend_name": self.status.backend_name,
            "last_update_date": "2021-03-01",
            "qubits": [[
                {"name": "T1", "unit": "us", "value": 98.2},
                {"name": "T2", "unit": "us", "value": 120.5}
            ]],
            "gates": [{"gate": "cx", "qubits": [0, 1], "parameters": []}],
            "general": []
        }))));
        self
    }

    pub fn with_jobs(mut self, jobs: Vec<FakeJob>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_failing_status(mut self) -> Self {
        self.failing_status = true;
        self
    }
}

impl fmt::Display for FakeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &str {
        self.configuration.backend_name()
    }

    fn provider_name(&self) -> String {
        "FakeProvider".to_string()
    }

    fn instance(&self) -> Option<&Instance> {
        Some(&self.instance)
    }

    fn configuration(&self) -> &BackendConfiguration {
        &self.configuration
    }

    async fn status(&self) -> HalResult<BackendStatus> {
        if self.failing_status {
            return Err(HalError::Backend("status endpoint unavailable".into()));
        }
        Ok(self.status.clone())
    }

    async fn properties(&self) -> HalResult<Option<BackendProperties>> {
        Ok(self.properties.clone())
    }

    async fn jobs(&self) -> HalResult<Vec<Box<dyn Job>>> {
        Ok(self
            .jobs
            .iter()
            .map(|job| Box::new(job.clone()) as Box<dyn Job>)
            .collect())
    }

    async fn retrieve_job(&self, job_id: &JobId) -> HalResult<Box<dyn Job>> {
        self.jobs
            .iter()
            .find(|job| &job.id == job_id)
            .map(|job| Box::new(job.clone()) as Box<dyn Job>)
            .ok_or_else(|| HalError::JobNotFound(job_id.to_string()))
    }
}

pub struct FakeProvider {
    instance: Instance,
    backends: Vec<Arc<dyn Backend>>,
    simulator: bool,
}

impl FakeProvider {
    pub fn new(instance: Instance, backends: Vec<Arc<FakeBackend>>) -> Self {
        Self {
            instance,
            backends: backends
                .into_iter()
                .map(|b| b as Arc<dyn Backend>)
                .collect(),
            simulator: false,
        }
    }

    pub fn simulator(mut self) -> Self {
        self.simulator = true;
        self
    }
}

impl fmt::Display for FakeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fake({})", self.instance)
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn instance(&self) -> Option<&Instance> {
        Some(&self.instance)
    }

    fn is_simulator(&self) -> bool {
        self.simulator
    }

    async fn backends(&self) -> HalResult<Vec<Arc<dyn Backend>>> {
        Ok(self.backends.clone())
    }
}

pub struct FakeService {
    providers: Vec<Arc<FakeProvider>>,
    default_instance: Option<Instance>,
}

impl FakeService {
    pub fn new(providers: Vec<FakeProvider>) -> Self {
        Self {
            providers: providers.into_iter().map(Arc::new).collect(),
            default_instance: None,
        }
    }

    pub fn with_default(mut self, instance: Instance) -> Self {
        self.default_instance = Some(instance);
        self
    }
}

#[async_trait]
impl QuantumService for FakeService {
    fn default_instance(&self) -> Option<&Instance> {
        self.default_instance.as_ref()
    }

    async fn providers(&self, filter: &InstanceFilter) -> HalResult<Vec<Arc<dyn Provider>>> {
        Ok(self
            .providers
            .iter()
            .filter(|p| filter.matches(&p.instance))
            .map(|p| Arc::clone(p) as Arc<dyn Provider>)
            .collect())
    }
}
