//! IBM Quantum job handle.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use qprobe_hal::{HalResult, Instance, Job, JobId, JobResult, JobStatus};

use crate::api::{IbmClient, JobInfo};

/// A job previously run on an IBM Quantum backend.
pub struct IbmJob {
    client: Arc<IbmClient>,
    instance: Instance,
    job_id: JobId,
    backend_name: String,
    creation_date: Option<DateTime<Utc>>,
}

impl IbmJob {
    pub(crate) fn from_info(
        client: Arc<IbmClient>,
        instance: Instance,
        info: JobInfo,
        fallback_backend: &str,
    ) -> Self {
        let creation_date = info.creation_date.as_deref().and_then(parse_creation_date);
        let backend_name = info
            .backend
            .map(|b| b.name)
            .unwrap_or_else(|| fallback_backend.to_string());
        Self {
            client,
            instance,
            job_id: JobId(info.id),
            backend_name,
            creation_date,
        }
    }
}

fn parse_creation_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map an API job status string to [`JobStatus`].
pub(crate) fn map_status(info: &JobInfo) -> JobStatus {
    match info.status.to_uppercase().as_str() {
        "CREATING" | "CREATED" | "VALIDATING" | "VALIDATED" | "QUEUED" => JobStatus::Queued,
        "RUNNING" => JobStatus::Running,
        "COMPLETED" => JobStatus::Completed,
        "CANCELLED" => JobStatus::Cancelled,
        other if other.starts_with("ERROR") || other == "FAILED" => {
            let msg = info
                .error
                .as_ref()
                .map(|e| e.message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| other.to_lowercase());
            JobStatus::Failed(msg)
        }
        _ => JobStatus::Running,
    }
}

impl fmt::Display for IbmJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IBMQJob({})", self.job_id)
    }
}

#[async_trait]
impl Job for IbmJob {
    fn job_id(&self) -> &JobId {
        &self.job_id
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    async fn status(&self) -> HalResult<JobStatus> {
        let info = self.client.job(&self.instance, &self.job_id.0).await?;
        Ok(map_status(&info))
    }

    async fn result(&self) -> HalResult<JobResult> {
        debug!("fetching result of job {}", self.job_id);
        let dict = self.client.job_result(&self.instance, &self.job_id.0).await?;
        Ok(JobResult::new(dict))
    }
}
