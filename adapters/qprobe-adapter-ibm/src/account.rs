//! IBM Quantum account credentials.
//!
//! ## Sources (in priority order)
//! 1. Environment: `IBM_QUANTUM_TOKEN`, optionally `IBM_QUANTUM_URL` and
//!    `IBM_QUANTUM_INSTANCE` (`hub/group/project`)
//! 2. Saved account file `~/.qiskit/qiskit-ibm.json`
//!
//! The saved file maps account names to entries; `default-ibm-quantum` is
//! used when present, otherwise the first entry.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use qprobe_hal::Instance;

use crate::error::{IbmError, IbmResult};

/// Default authentication endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://auth.quantum-computing.ibm.com/api";

/// Account name preferred in the saved account file.
const DEFAULT_ACCOUNT_NAME: &str = "default-ibm-quantum";

/// Credentials for one IBM Quantum account.
#[derive(Clone)]
pub struct IbmAccount {
    token: String,
    url: String,
    instance: Option<Instance>,
}

impl fmt::Debug for IbmAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmAccount")
            .field("token", &"[REDACTED]")
            .field("url", &self.url)
            .field("instance", &self.instance)
            .finish()
    }
}

/// One entry of the saved account file.
#[derive(Debug, Deserialize)]
struct SavedAccount {
    token: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    instance: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

impl IbmAccount {
    /// Account with a token and the default auth endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            url: DEFAULT_AUTH_URL.to_string(),
            instance: None,
        }
    }

    /// Override the auth endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the default instance.
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instance = Some(instance);
        self
    }

    /// API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Auth endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Default instance, if configured.
    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    /// Load from the environment, falling back to the saved account file.
    pub fn load() -> IbmResult<Self> {
        if let Some(account) = Self::from_env()? {
            debug!("using IBM Quantum account from environment");
            return Ok(account);
        }

        let path = Self::default_account_path()?;
        if !path.exists() {
            return Err(IbmError::MissingToken);
        }
        Self::load_from(&path)
    }

    /// Load the saved account file at `path`.
    pub fn load_from(path: &Path) -> IbmResult<Self> {
        debug!("reading IBM Quantum account from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| IbmError::AccountFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse_saved(&content).map_err(|reason| IbmError::AccountFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// `~/.qiskit/qiskit-ibm.json`.
    pub fn default_account_path() -> IbmResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            IbmError::InvalidParameter("could not determine home directory".into())
        })?;
        Ok(home.join(".qiskit").join("qiskit-ibm.json"))
    }

    fn from_env() -> IbmResult<Option<Self>> {
        let Ok(token) = env::var("IBM_QUANTUM_TOKEN") else {
            return Ok(None);
        };

        let mut account = Self::new(token);
        if let Ok(url) = env::var("IBM_QUANTUM_URL") {
            account = account.with_url(url);
        }
        if let Ok(instance) = env::var("IBM_QUANTUM_INSTANCE") {
            let instance = instance
                .parse::<Instance>()
                .map_err(|e| IbmError::InvalidParameter(e.to_string()))?;
            account = account.with_instance(instance);
        }
        Ok(Some(account))
    }

    fn parse_saved(content: &str) -> Result<Self, String> {
        let accounts: Map<String, Value> =
            serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;

        let (name, entry) = accounts
            .get(DEFAULT_ACCOUNT_NAME)
            .map(|entry| (DEFAULT_ACCOUNT_NAME, entry))
            .or_else(|| accounts.iter().next().map(|(k, v)| (k.as_str(), v)))
            .ok_or_else(|| "no accounts saved".to_string())?;

        let saved = SavedAccount::deserialize(entry)
            .map_err(|e| format!("account '{name}' is malformed: {e}"))?;

        if let Some(channel) = saved.channel.as_deref() {
            if channel != "ibm_quantum" {
                return Err(format!(
                    "account '{name}' uses channel '{channel}', only ibm_quantum is supported"
                ));
            }
        }

        let mut account = Self::new(saved.token);
        if let Some(url) = saved.url {
            account = account.with_url(url);
        }
        if let Some(instance) = saved.instance {
            let instance = instance.parse::<Instance>().map_err(|e| e.to_string())?;
            account = account.with_instance(instance);
        }
        Ok(account)
    }
}
