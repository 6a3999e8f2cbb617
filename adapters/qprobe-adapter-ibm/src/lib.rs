//! IBM Quantum adapter for qprobe.
//!
//! Read-only access to IBM Quantum accounts through the REST API: instance
//! discovery, device configuration, status and calibration data, and job
//! history with results.
//!
//! # Authentication
//!
//! Credentials are taken from `IBM_QUANTUM_TOKEN` (optionally with
//! `IBM_QUANTUM_URL` and `IBM_QUANTUM_INSTANCE`) or from the saved account
//! file `~/.qiskit/qiskit-ibm.json`.
//!
//! # Example
//!
//! ```ignore
//! use qprobe_adapter_ibm::{IbmAccount, IbmService};
//! use qprobe_hal::{InstanceFilter, QuantumService};
//!
//! let account = IbmAccount::load()?;
//! let service = IbmService::connect(&account).await?;
//! let provider = service.get_provider(&InstanceFilter::any()).await?;
//! for backend in provider.backends().await? {
//!     println!("{backend}: {:?}", backend.status().await?);
//! }
//! ```

mod account;
mod api;
mod backend;
mod error;
mod job;
mod service;

pub use account::{DEFAULT_AUTH_URL, IbmAccount};
pub use api::{DEFAULT_JOB_LIMIT, IbmClient};
pub use backend::IbmBackend;
pub use error::{IbmError, IbmResult};
pub use job::IbmJob;
pub use service::{IbmProvider, IbmService};
