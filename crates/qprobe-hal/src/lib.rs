//! qprobe Hardware Abstraction Layer
//!
//! Read-only view onto a quantum computing service: the accounts, providers,
//! backends and jobs it exposes. Nothing here submits work.
//!
//! # Overview
//!
//! - [`QuantumService`]: a logged-in account; hands out providers per
//!   hub/group/project [`Instance`]
//! - [`Provider`]: an instance-scoped set of backends
//! - [`Backend`]: configuration, status, calibration properties and jobs
//! - [`Job`]: status, metadata and the [`JobResult`] document
//!
//! # Implementations
//!
//! | Service | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local simulators | `qprobe-adapter-sim` | None |
//! | IBM Quantum | `qprobe-adapter-ibm` | `IBM_QUANTUM_TOKEN` or `~/.qiskit/qiskit-ibm.json` |
//!
//! # Example: least-busy device
//!
//! ```ignore
//! use qprobe_hal::{InstanceFilter, QuantumService};
//!
//! async fn pick(service: &dyn QuantumService) -> qprobe_hal::HalResult<()> {
//!     let provider = service.get_provider(&InstanceFilter::any().with_hub("ibm-q")).await?;
//!     for backend in provider.backends().await? {
//!         let status = backend.status().await?;
//!         println!("{}: {} pending", backend.name(), status.pending_jobs);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod instance;
pub mod job;
pub mod provider;

pub use backend::{
    Backend, BackendConfiguration, BackendProperties, BackendStatus, CLOUD_SIMULATOR,
    LOCAL_SIMULATORS, QASM_SIMULATOR, STATEVECTOR_SIMULATOR, UNITARY_SIMULATOR,
};
pub use error::{HalError, HalResult};
pub use instance::{Instance, InstanceFilter};
pub use job::{ExperimentData, ExperimentHeader, ExperimentResult, Job, JobId, JobResult, JobStatus};
pub use provider::{Provider, QuantumService};
