//! Logged-in IBM Quantum session and its per-instance providers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use qprobe_hal::{
    Backend, BackendConfiguration, HalResult, Instance, InstanceFilter, Provider, QuantumService,
};

use crate::account::IbmAccount;
use crate::api::IbmClient;
use crate::backend::IbmBackend;
use crate::error::IbmResult;

/// A logged-in IBM Quantum account.
///
/// Holds the instances (hub/group/project) visible to the account; each one
/// is exposed as an [`IbmProvider`].
pub struct IbmService {
    client: Arc<IbmClient>,
    instances: Vec<Instance>,
    default_instance: Option<Instance>,
}

impl IbmService {
    /// Log in and enumerate the account's instances.
    ///
    /// The default instance is the account's configured one, else the
    /// project the service marks as default.
    pub async fn connect(account: &IbmAccount) -> IbmResult<Self> {
        let client = IbmClient::login(account).await?;
        let hubs = client.hubs().await?;

        let mut instances = Vec::new();
        let mut flagged_default = None;
        for hub in &hubs {
            for (instance, is_default) in hub.instances() {
                if is_default && flagged_default.is_none() {
                    flagged_default = Some(instance.clone());
                }
                instances.push(instance);
            }
        }
        info!("connected to IBM Quantum ({} instances)", instances.len());

        let default_instance = account.instance().cloned().or(flagged_default);
        Ok(Self::from_parts(Arc::new(client), instances, default_instance))
    }

    /// Service over an existing client and known instances.
    pub fn from_parts(
        client: Arc<IbmClient>,
        instances: Vec<Instance>,
        default_instance: Option<Instance>,
    ) -> Self {
        if let Some(default) = &default_instance {
            if !instances.contains(default) {
                warn!("default instance {default} is not visible to this account");
            }
        }
        Self {
            client,
            instances,
            default_instance,
        }
    }
}

#[async_trait]
impl QuantumService for IbmService {
    fn default_instance(&self) -> Option<&Instance> {
        self.default_instance.as_ref()
    }

    async fn providers(&self, filter: &InstanceFilter) -> HalResult<Vec<Arc<dyn Provider>>> {
        Ok(self
            .instances
            .iter()
            .filter(|instance| filter.matches(instance))
            .map(|instance| {
                Arc::new(IbmProvider::new(Arc::clone(&self.client), instance.clone()))
                    as Arc<dyn Provider>
            })
            .collect())
    }
}

/// Access to the backends of one hub/group/project.
pub struct IbmProvider {
    client: Arc<IbmClient>,
    instance: Instance,
}

impl IbmProvider {
    /// Provider for `instance`.
    pub fn new(client: Arc<IbmClient>, instance: Instance) -> Self {
        Self { client, instance }
    }
}

impl fmt::Display for IbmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IBMQ({})", self.instance)
    }
}

#[async_trait]
impl Provider for IbmProvider {
    fn instance(&self) -> Option<&Instance> {
        Some(&self.instance)
    }

    async fn backends(&self) -> HalResult<Vec<Arc<dyn Backend>>> {
        let devices = self.client.devices(&self.instance).await?;
        debug!("{} backends in {}", devices.len(), self.instance);
        let provider_name = self.to_string();
        Ok(devices
            .into_iter()
            .map(|config| {
                Arc::new(IbmBackend::new(
                    Arc::clone(&self.client),
                    self.instance.clone(),
                    provider_name.clone(),
                    BackendConfiguration::new(config),
                )) as Arc<dyn Backend>
            })
            .collect())
    }
}
