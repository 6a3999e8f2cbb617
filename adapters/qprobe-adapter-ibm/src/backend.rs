//! IBM Quantum backend handle.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use qprobe_hal::{
    Backend, BackendConfiguration, BackendProperties, BackendStatus, HalResult, Instance, Job,
    JobId,
};

use crate::api::{DEFAULT_JOB_LIMIT, DeviceStatusResponse, IbmClient};
use crate::job::IbmJob;

/// How long fetched calibration properties stay fresh.
const PROPERTIES_TTL: Duration = Duration::from_secs(5 * 60);

/// A device (or cloud simulator) of one IBM Quantum instance.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    instance: Instance,
    provider_name: String,
    configuration: BackendConfiguration,
    /// Cached properties with fetch timestamp for TTL-based refresh.
    properties: RwLock<Option<(Option<BackendProperties>, Instant)>>,
}

impl IbmBackend {
    pub(crate) fn new(
        client: Arc<IbmClient>,
        instance: Instance,
        provider_name: String,
        configuration: BackendConfiguration,
    ) -> Self {
        Self {
            client,
            instance,
            provider_name,
            configuration,
            properties: RwLock::new(None),
        }
    }

    async fn fetch_properties(&self) -> HalResult<Option<BackendProperties>> {
        let dict = self
            .client
            .device_properties(&self.instance, self.name())
            .await?;
        let props = BackendProperties::new(dict);
        Ok((!props.is_empty()).then_some(props))
    }
}

fn status_from_response(name: &str, response: DeviceStatusResponse) -> BackendStatus {
    BackendStatus {
        backend_name: name.to_string(),
        backend_version: response.backend_version,
        operational: response.state,
        pending_jobs: u32::try_from(response.length_queue).unwrap_or(u32::MAX),
        status_msg: response.status,
    }
}

impl fmt::Display for IbmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        self.configuration.backend_name()
    }

    fn provider_name(&self) -> String {
        self.provider_name.clone()
    }

    fn instance(&self) -> Option<&Instance> {
        Some(&self.instance)
    }

    fn configuration(&self) -> &BackendConfiguration {
        &self.configuration
    }

    async fn status(&self) -> HalResult<BackendStatus> {
        let response = self.client.device_status(&self.instance, self.name()).await?;
        Ok(status_from_response(self.name(), response))
    }

    async fn properties(&self) -> HalResult<Option<BackendProperties>> {
        {
            let cached = self.properties.read().await;
            if let Some((ref props, fetched_at)) = *cached {
                if fetched_at.elapsed() < PROPERTIES_TTL {
                    return Ok(props.clone());
                }
            }
        }

        let props = self.fetch_properties().await?;

        {
            let mut cached = self.properties.write().await;
            *cached = Some((props.clone(), Instant::now()));
        }

        Ok(props)
    }

    async fn jobs(&self) -> HalResult<Vec<Box<dyn Job>>> {
        let infos = self
            .client
            .jobs(&self.instance, self.name(), DEFAULT_JOB_LIMIT)
            .await?;
        debug!("{} jobs on {}", infos.len(), self.name());
        Ok(infos
            .into_iter()
            .map(|info| {
                Box::new(IbmJob::from_info(
                    Arc::clone(&self.client),
                    self.instance.clone(),
                    info,
                    self.name(),
                )) as Box<dyn Job>
            })
            .collect())
    }

    async fn retrieve_job(&self, job_id: &JobId) -> HalResult<Box<dyn Job>> {
        let info = self.client.job(&self.instance, &job_id.0).await?;
        Ok(Box::new(IbmJob::from_info(
            Arc::clone(&self.client),
            self.instance.clone(),
            info,
            self.name(),
        )))
    }
}
