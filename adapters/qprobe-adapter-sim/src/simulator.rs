//! Local simulator handles.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value, json};
use tracing::debug;

use qprobe_hal::{
    Backend, BackendConfiguration, BackendProperties, BackendStatus, HalError, HalResult,
    Instance, Job, JobId, LOCAL_SIMULATORS, Provider, QASM_SIMULATOR, STATEVECTOR_SIMULATOR,
    UNITARY_SIMULATOR,
};

/// Reported as `backend_version` by every local simulator.
const SIMULATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display name of the local provider.
const PROVIDER_NAME: &str = "AerProvider";

/// Gates every local simulator accepts.
const BASIS_GATES: &[&str] = &[
    "u1", "u2", "u3", "cx", "cz", "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "swap",
    "ccx", "unitary", "initialize",
];

/// Static description of one simulator.
struct SimulatorSpec {
    name: &'static str,
    n_qubits: u32,
    max_shots: u32,
    memory: bool,
    description: &'static str,
}

const SPECS: [SimulatorSpec; 3] = [
    SimulatorSpec {
        name: STATEVECTOR_SIMULATOR,
        n_qubits: 32,
        max_shots: 1,
        memory: true,
        description: "A C++ statevector simulator",
    },
    SimulatorSpec {
        name: UNITARY_SIMULATOR,
        n_qubits: 16,
        max_shots: 1,
        memory: false,
        description: "A C++ unitary simulator",
    },
    SimulatorSpec {
        name: QASM_SIMULATOR,
        n_qubits: 32,
        max_shots: 1_000_000,
        memory: true,
        description: "A C++ QasmQobj simulator with noise",
    },
];

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Build the configuration dictionary for a simulator.
fn configuration_for(spec: &SimulatorSpec) -> BackendConfiguration {
    let gates: Vec<Value> = BASIS_GATES
        .iter()
        .map(|gate| {
            json!({
                "name": gate,
                "parameters": [],
            })
        })
        .collect();

    BackendConfiguration::new(into_map(json!({
        "backend_name": spec.name,
        "backend_version": SIMULATOR_VERSION,
        "n_qubits": spec.n_qubits,
        "basis_gates": BASIS_GATES,
        "gates": gates,
        "local": true,
        "simulator": true,
        "conditional": true,
        "open_pulse": false,
        "memory": spec.memory,
        "max_shots": spec.max_shots,
        "coupling_map": Value::Null,
        "description": spec.description,
    })))
}

/// One local simulator.
pub struct SimulatorBackend {
    configuration: BackendConfiguration,
}

impl SimulatorBackend {
    fn from_spec(spec: &SimulatorSpec) -> Self {
        Self {
            configuration: configuration_for(spec),
        }
    }
}

impl fmt::Display for SimulatorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        self.configuration.backend_name()
    }

    fn provider_name(&self) -> String {
        PROVIDER_NAME.to_string()
    }

    fn configuration(&self) -> &BackendConfiguration {
        &self.configuration
    }

    async fn status(&self) -> HalResult<BackendStatus> {
        Ok(BackendStatus::always_operational(self.name(), SIMULATOR_VERSION))
    }

    async fn properties(&self) -> HalResult<Option<BackendProperties>> {
        Ok(None)
    }

    async fn jobs(&self) -> HalResult<Vec<Box<dyn Job>>> {
        Ok(Vec::new())
    }

    async fn retrieve_job(&self, job_id: &JobId) -> HalResult<Box<dyn Job>> {
        Err(HalError::JobNotFound(format!(
            "{job_id} (local simulators keep no job history)"
        )))
    }
}

/// The local provider serving the three fixed simulators.
pub struct LocalSimulators {
    backends: FxHashMap<&'static str, Arc<SimulatorBackend>>,
}

impl LocalSimulators {
    /// Create the provider with all three simulators.
    pub fn new() -> Self {
        let backends = SPECS
            .iter()
            .map(|spec| (spec.name, Arc::new(SimulatorBackend::from_spec(spec))))
            .collect();
        Self { backends }
    }

    /// Whether `name` is one of the local simulators.
    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }
}

impl Default for LocalSimulators {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalSimulators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PROVIDER_NAME}")
    }
}

#[async_trait]
impl Provider for LocalSimulators {
    fn instance(&self) -> Option<&Instance> {
        None
    }

    fn is_simulator(&self) -> bool {
        true
    }

    async fn backends(&self) -> HalResult<Vec<Arc<dyn Backend>>> {
        Ok(LOCAL_SIMULATORS
            .iter()
            .filter_map(|name| self.backends.get(name))
            .map(|b| Arc::clone(b) as Arc<dyn Backend>)
            .collect())
    }

    async fn get_backend(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        debug!("looking up local simulator {name}");
        self.backends
            .get(name)
            .map(|b| Arc::clone(b) as Arc<dyn Backend>)
            .ok_or_else(|| HalError::BackendNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backends_in_listing_order() {
        let local = LocalSimulators::new();
        let names: Vec<String> = local
            .backends()
            .await
            .unwrap()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, LOCAL_SIMULATORS.to_vec());
    }

    #[tokio::test]
    async fn test_get_backend_qasm() {
        let local = LocalSimulators::new();
        let sim = local.get_backend(QASM_SIMULATOR).await.unwrap();
        assert_eq!(sim.name(), QASM_SIMULATOR);
        assert_eq!(sim.provider_name(), "AerProvider");
        assert!(sim.configuration().simulator());
        assert_eq!(sim.configuration().n_qubits(), 32);
        assert!(sim.instance().is_none());
    }

    #[tokio::test]
    async fn test_get_backend_unknown() {
        let local = LocalSimulators::new();
        let err = local.get_backend("ibmq_lima").await.err().unwrap();
        assert!(matches!(err, HalError::BackendNotFound(_)));
    }

    #[tokio::test]
    async fn test_simulator_status_and_properties() {
        let local = LocalSimulators::new();
        let sim = local.get_backend(UNITARY_SIMULATOR).await.unwrap();
        let status = sim.status().await.unwrap();
        assert!(status.operational);
        assert_eq!(status.pending_jobs, 0);
        assert_eq!(status.backend_name, UNITARY_SIMULATOR);
        assert!(sim.properties().await.unwrap().is_none());
        assert!(sim.jobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_job_fails() {
        let local = LocalSimulators::new();
        let sim = local.get_backend(QASM_SIMULATOR).await.unwrap();
        let err = sim.retrieve_job(&JobId::new("abc")).await.err().unwrap();
        assert!(matches!(err, HalError::JobNotFound(_)));
    }

    #[test]
    fn test_configuration_has_gate_entries() {
        let config = configuration_for(&SPECS[2]);
        let gates = config.get("gates").and_then(Value::as_array).unwrap();
        assert_eq!(gates.len(), BASIS_GATES.len());
        assert_eq!(config.basis_gates().len(), BASIS_GATES.len());
    }

    #[test]
    fn test_provider_is_simulator() {
        let local = LocalSimulators::new();
        assert!(local.is_simulator());
        assert!(local.contains(STATEVECTOR_SIMULATOR));
        assert!(!local.contains("ibmq_qasm_simulator"));
        assert_eq!(local.to_string(), "AerProvider");
    }
}
