//! Backend selection.
//!
//! Resolves one backend handle from simple criteria:
//!
//! | Query | Result |
//! |-------|--------|
//! | `use_cloud_sim` | `ibmq_qasm_simulator` from the matching provider |
//! | `use_sim` | local `qasm_simulator` |
//! | `backend_name` | that backend, which must be operational |
//! | otherwise | least-busy operational device with at least `min_qubits` |

use std::sync::Arc;

use tracing::debug;

use qprobe_hal::{
    Backend, BackendStatus, CLOUD_SIMULATOR, HalError, HalResult, InstanceFilter,
    LOCAL_SIMULATORS, Provider, QASM_SIMULATOR, QuantumService,
};

/// Selection criteria for [`get_backend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendQuery {
    /// Provider scope.
    pub instance: InstanceFilter,
    /// Explicit backend name.
    pub backend_name: Option<String>,
    /// Select a simulator instead of a device.
    pub use_sim: bool,
    /// With a simulator, use the cloud one instead of the local one.
    pub use_cloud_sim: bool,
    /// Minimum qubit count for automatic selection.
    pub min_qubits: u32,
}

impl Default for BackendQuery {
    fn default() -> Self {
        Self {
            instance: InstanceFilter::any(),
            backend_name: None,
            use_sim: false,
            use_cloud_sim: false,
            min_qubits: 1,
        }
    }
}

impl BackendQuery {
    /// Query with default criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to providers matching `instance`.
    pub fn with_instance(mut self, instance: InstanceFilter) -> Self {
        self.instance = instance;
        self
    }

    /// Select the named backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.backend_name = Some(name.into());
        self
    }

    /// Select the local simulator.
    pub fn local_sim(mut self) -> Self {
        self.use_sim = true;
        self
    }

    /// Select the cloud simulator.
    pub fn cloud_sim(mut self) -> Self {
        self.use_cloud_sim = true;
        self
    }

    /// Require at least `n` qubits.
    pub fn with_min_qubits(mut self, n: u32) -> Self {
        self.min_qubits = n;
        self
    }

    /// Whether resolving this query needs the cloud service.
    ///
    /// Local simulators, by flag or by name, resolve without an account.
    pub fn needs_cloud(&self) -> bool {
        if self.use_cloud_sim {
            return true;
        }
        if self.use_sim {
            return false;
        }
        match &self.backend_name {
            Some(name) => !LOCAL_SIMULATORS.contains(&name.as_str()),
            None => true,
        }
    }
}

/// A lookup that yields either one handle or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    /// A single handle.
    One(T),
    /// Several handles; the first one is used.
    List(Vec<T>),
}

impl<T> Resolved<T> {
    /// The single handle, or the first element of a list.
    pub fn into_one(self) -> Option<T> {
        match self {
            Resolved::One(item) => Some(item),
            Resolved::List(items) => items.into_iter().next(),
        }
    }
}

/// The candidate with the smallest pending-job queue; the first one wins ties.
pub fn least_busy<T>(candidates: Vec<(T, BackendStatus)>) -> Option<T> {
    candidates
        .into_iter()
        .min_by_key(|(_, status)| status.pending_jobs)
        .map(|(backend, _)| backend)
}

fn require_service(service: Option<&dyn QuantumService>) -> HalResult<&dyn QuantumService> {
    service.ok_or_else(|| {
        HalError::AuthenticationFailed("an IBM Quantum account is required for this query".into())
    })
}

async fn by_name(provider: &dyn Provider, name: &str) -> HalResult<Resolved<Arc<dyn Backend>>> {
    let mut matching: Vec<_> = provider
        .backends()
        .await?
        .into_iter()
        .filter(|b| b.name() == name)
        .collect();
    match matching.len() {
        0 => Err(HalError::BackendNotFound(name.to_string())),
        1 => Ok(Resolved::One(matching.remove(0))),
        n => {
            debug!("{n} backends named {name} in {provider}, using the first");
            Ok(Resolved::List(matching))
        }
    }
}

async fn automatic(provider: &dyn Provider, min_qubits: u32) -> HalResult<Arc<dyn Backend>> {
    let mut candidates = Vec::new();
    for backend in provider.backends().await? {
        let config = backend.configuration();
        if config.simulator() || config.n_qubits() < min_qubits {
            continue;
        }
        let status = backend.status().await?;
        if status.operational {
            candidates.push((backend, status));
        }
    }
    debug!(
        "{} operational devices with >= {min_qubits} qubits in {provider}",
        candidates.len()
    );
    least_busy(candidates).ok_or(HalError::NoSuitableBackend { min_qubits })
}

/// Resolve one backend matching `query`.
///
/// `local` serves the local simulators; `service` is only consulted when the
/// query needs the cloud (see [`BackendQuery::needs_cloud`]).
pub async fn get_backend(
    query: &BackendQuery,
    service: Option<&dyn QuantumService>,
    local: &dyn Provider,
) -> HalResult<Arc<dyn Backend>> {
    let resolved = if query.use_sim || query.use_cloud_sim {
        if query.use_cloud_sim {
            let provider = require_service(service)?
                .get_provider(&query.instance)
                .await?;
            Resolved::One(provider.get_backend(CLOUD_SIMULATOR).await?)
        } else {
            Resolved::One(local.get_backend(QASM_SIMULATOR).await?)
        }
    } else if let Some(name) = query.backend_name.as_deref() {
        let resolved = if LOCAL_SIMULATORS.contains(&name) {
            Resolved::One(local.get_backend(name).await?)
        } else {
            let provider = require_service(service)?
                .get_provider(&query.instance)
                .await?;
            by_name(provider.as_ref(), name).await?
        };
        let backend = resolved
            .into_one()
            .ok_or_else(|| HalError::BackendNotFound(name.to_string()))?;
        if !backend.status().await?.operational {
            return Err(HalError::NotOperational(name.to_string()));
        }
        Resolved::One(backend)
    } else {
        let provider = require_service(service)?
            .get_provider(&query.instance)
            .await?;
        Resolved::One(automatic(provider.as_ref(), query.min_qubits).await?)
    };

    let backend = resolved
        .into_one()
        .ok_or_else(|| HalError::BackendNotFound("empty selection".into()))?;
    debug!("selected backend {backend}");
    Ok(backend)
}
