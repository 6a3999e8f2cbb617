//! IBM Quantum REST API client.
//!
//! Implements the parts of the IBM Quantum API needed to inspect an account:
//! - Token login against the auth service and API URL discovery
//! - Hub/group/project enumeration
//! - Device configuration, queue status and calibration properties
//! - Job listing, lookup and result download
//!
//! Every project-scoped call lives under
//! `{api}/Network/{hub}/Groups/{group}/Projects/{project}`.

// Response fields below mirror the API documents; not all are read yet.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use qprobe_hal::Instance;

use crate::account::IbmAccount;
use crate::error::{IbmError, IbmResult};

/// Number of jobs fetched per backend listing.
pub const DEFAULT_JOB_LIMIT: usize = 10;

/// User-Agent sent with requests.
const USER_AGENT: &str = concat!("qprobe/", env!("CARGO_PKG_VERSION"));

/// Header carrying the session token.
const ACCESS_TOKEN_HEADER: &str = "x-access-token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// IBM Quantum API client.
pub struct IbmClient {
    /// HTTP client carrying the session token.
    client: Client,
    /// API base URL (discovered at login).
    api_url: String,
    /// Session token.
    access_token: String,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("api_url", &self.api_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /users/loginWithToken`.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    /// Session token.
    id: String,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
    #[serde(default)]
    ttl: Option<u64>,
}

/// Response of `GET /users/me`.
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    urls: ServiceUrls,
}

#[derive(Debug, Deserialize)]
struct ServiceUrls {
    /// REST API base URL.
    http: String,
}

/// API error document (`{"error": {...}}`).
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<u16>,
}

/// Response of `GET .../Jobs/{id}/resultDownloadUrl`.
#[derive(Debug, Deserialize)]
struct ResultUrlResponse {
    url: String,
}

fn build_client(access_token: Option<&str>) -> IbmResult<Client> {
    let mut headers = header::HeaderMap::new();
    if let Some(token) = access_token {
        headers.insert(
            header::HeaderName::from_static(ACCESS_TOKEN_HEADER),
            header::HeaderValue::from_str(token).map_err(|_| IbmError::InvalidToken)?,
        );
    }
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?)
}

/// Decode a JSON body, turning error statuses into [`IbmError`].
async fn read_json<T: DeserializeOwned>(
    response: Response,
    not_found: Option<IbmError>,
) -> IbmResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(IbmError::from);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    Err(api_error(status, &body, not_found))
}

/// Error for a failed response.
///
/// A 404 maps to `not_found` when one is given. Bodies that are not an API
/// error document are kept verbatim after the status.
fn api_error(status: StatusCode, body: &str, not_found: Option<IbmError>) -> IbmError {
    if status == StatusCode::NOT_FOUND {
        if let Some(err) = not_found {
            return err;
        }
    }

    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api) => IbmError::ApiError {
            code: api.error.code,
            message: api.error.message,
        },
        Err(_) => IbmError::ApiError {
            code: None,
            message: format!("{status}: {body}"),
        },
    }
}

impl IbmClient {
    /// Exchange the account token for a session and discover the API URL.
    pub async fn login(account: &IbmAccount) -> IbmResult<Self> {
        let auth_client = build_client(None)?;

        let login_url = format!("{}/users/loginWithToken", account.url());
        debug!("logging in at {login_url}");
        let response = auth_client
            .post(&login_url)
            .json(&serde_json::json!({ "apiToken": account.token() }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(IbmError::LoginFailed("token rejected".into()));
        }
        let login: LoginResponse = read_json(response, None)
            .await
            .map_err(|e| IbmError::LoginFailed(e.to_string()))?;

        let public_client = build_client(Some(&login.id))?;
        let user_url = format!("{}/users/me", account.url());
        let response = public_client.get(&user_url).send().await?;
        let user: UserInfoResponse = read_json(response, None).await?;

        debug!("API base URL: {}", user.urls.http);
        Self::with_access_token(user.urls.http, login.id)
    }

    /// Client for an already-established session.
    pub fn with_access_token(
        api_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> IbmResult<Self> {
        let access_token = access_token.into();
        Ok(Self {
            client: build_client(Some(&access_token))?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn project_url(&self, instance: &Instance) -> String {
        format!(
            "{}/Network/{}/Groups/{}/Projects/{}",
            self.api_url, instance.hub, instance.group, instance.project
        )
    }

    /// Hubs (with their groups and projects) visible to the account.
    pub async fn hubs(&self) -> IbmResult<Vec<HubInfo>> {
        let url = format!("{}/Network", self.api_url);
        let response = self.client.get(&url).send().await?;
        read_json(response, None).await
    }

    /// Configuration documents of every device in an instance.
    pub async fn devices(&self, instance: &Instance) -> IbmResult<Vec<Map<String, Value>>> {
        let url = format!("{}/devices/v/1", self.project_url(instance));
        debug!("listing devices for {instance}");
        let response = self.client.get(&url).send().await?;
        read_json(response, None).await
    }

    /// Queue status of a device.
    pub async fn device_status(
        &self,
        instance: &Instance,
        name: &str,
    ) -> IbmResult<DeviceStatusResponse> {
        let url = format!("{}/devices/{}/queue/status", self.project_url(instance), name);
        let response = self.client.get(&url).send().await?;
        read_json(response, Some(IbmError::BackendNotFound(name.to_string()))).await
    }

    /// Calibration properties of a device. Simulators return an empty document.
    pub async fn device_properties(
        &self,
        instance: &Instance,
        name: &str,
    ) -> IbmResult<Map<String, Value>> {
        let url = format!("{}/devices/{}/properties", self.project_url(instance), name);
        let response = self
            .client
            .get(&url)
            .query(&[("version", "1")])
            .send()
            .await?;
        read_json(response, Some(IbmError::BackendNotFound(name.to_string()))).await
    }

    /// Most recent jobs run on `backend`, newest first.
    pub async fn jobs(
        &self,
        instance: &Instance,
        backend: &str,
        limit: usize,
    ) -> IbmResult<Vec<JobInfo>> {
        let url = format!("{}/Jobs/status/v/1", self.project_url(instance));
        let filter = jobs_filter(backend, limit);
        debug!("listing jobs on {backend} (limit {limit})");
        let response = self
            .client
            .get(&url)
            .query(&[("filter", filter.to_string())])
            .send()
            .await?;
        read_json(response, None).await
    }

    /// A single job.
    pub async fn job(&self, instance: &Instance, job_id: &str) -> IbmResult<JobInfo> {
        let url = format!("{}/Jobs/{}/v/1", self.project_url(instance), job_id);
        let response = self.client.get(&url).send().await?;
        read_json(response, Some(IbmError::JobNotFound(job_id.to_string()))).await
    }

    /// The result document of a job.
    ///
    /// Results are fetched from a pre-signed download URL, which must not
    /// receive the session token.
    pub async fn job_result(
        &self,
        instance: &Instance,
        job_id: &str,
    ) -> IbmResult<Map<String, Value>> {
        let url = format!(
            "{}/Jobs/{}/resultDownloadUrl",
            self.project_url(instance),
            job_id
        );
        let response = self.client.get(&url).send().await?;
        let location: ResultUrlResponse =
            read_json(response, Some(IbmError::ResultUnavailable(job_id.to_string()))).await?;

        debug!("downloading result of job {job_id}");
        let download = build_client(None)?;
        let response = download.get(&location.url).send().await?;
        read_json(response, Some(IbmError::ResultUnavailable(job_id.to_string()))).await
    }
}

/// Query filter selecting the latest jobs of one backend.
fn jobs_filter(backend: &str, limit: usize) -> Value {
    serde_json::json!({
        "where": { "backend.name": backend },
        "order": "creationDate DESC",
        "limit": limit,
    })
}

// ============================================================================
// Response types
// ============================================================================

/// A hub visible to the account.
#[derive(Debug, Clone, Deserialize)]
pub struct HubInfo {
    /// Hub name.
    pub name: String,
    /// Groups keyed by name.
    #[serde(default)]
    pub groups: BTreeMap<String, GroupInfo>,
}

/// A group within a hub.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupInfo {
    /// Group name.
    pub name: String,
    /// Projects keyed by name.
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectInfo>,
}

/// A project within a group.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    /// Project name.
    pub name: String,
    /// Whether the account marks this project as its default.
    #[serde(default, rename = "isDefault")]
    pub is_default: bool,
}

impl HubInfo {
    /// Flatten into `(instance, is_default)` pairs.
    pub fn instances(&self) -> Vec<(Instance, bool)> {
        self.groups
            .values()
            .flat_map(|group| {
                group.projects.values().map(move |project| {
                    (
                        Instance::new(&self.name, &group.name, &project.name),
                        project.is_default,
                    )
                })
            })
            .collect()
    }
}

/// Queue status of a device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatusResponse {
    /// Whether the device is operational.
    pub state: bool,
    /// Status string (e.g. "active").
    #[serde(default)]
    pub status: String,
    /// Status message.
    #[serde(default)]
    pub message: String,
    /// Jobs waiting in the queue.
    #[serde(default, rename = "lengthQueue", alias = "length_queue")]
    pub length_queue: u64,
    /// Device version.
    #[serde(default)]
    pub backend_version: String,
}

/// Job metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    /// Job ID.
    pub id: String,
    /// Job status (e.g. "COMPLETED", "ERROR_RUNNING_JOB").
    pub status: String,
    /// Creation time (RFC 3339).
    #[serde(default, rename = "creationDate")]
    pub creation_date: Option<String>,
    /// Backend the job was sent to.
    #[serde(default)]
    pub backend: Option<JobBackend>,
    /// Failure information.
    #[serde(default)]
    pub error: Option<JobError>,
}

/// Backend reference inside a job document.
#[derive(Debug, Clone, Deserialize)]
pub struct JobBackend {
    /// Backend name.
    pub name: String,
}

/// Failure information inside a job document.
#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    /// Error code.
    #[serde(default)]
    pub code: Option<u32>,
    /// Error message.
    #[serde(default)]
    pub message: String,
}
