//! Common utilities for CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use qprobe_adapter_ibm::{IbmAccount, IbmError, IbmService};
use qprobe_adapter_sim::LocalSimulators;
use qprobe_hal::{Backend, InstanceFilter, Provider, QuantumService};

/// Per-invocation state: the local simulators and where to find the account.
///
/// The cloud account is only read and logged into when a command needs it.
pub struct Session {
    account_path: Option<PathBuf>,
    local: LocalSimulators,
}

impl Session {
    pub fn new(account_path: Option<PathBuf>) -> Self {
        Self {
            account_path,
            local: LocalSimulators::new(),
        }
    }

    /// The local simulator provider.
    pub fn local(&self) -> &LocalSimulators {
        &self.local
    }

    fn load_account(&self) -> Result<IbmAccount, IbmError> {
        match &self.account_path {
            Some(path) => IbmAccount::load_from(path),
            None => IbmAccount::load(),
        }
    }

    /// Log in to IBM Quantum.
    pub async fn connect(&self) -> Result<IbmService> {
        let account = self.load_account()?;
        Self::login(&account).await
    }

    async fn login(account: &IbmAccount) -> Result<IbmService> {
        debug!("loaded account {account:?}");

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Connecting to IBM Quantum...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let service = IbmService::connect(account).await;
        spinner.finish_and_clear();

        service.context("Failed to connect to IBM Quantum")
    }

    /// Log in if an account is configured; `None` when there is none.
    pub async fn try_connect(&self) -> Result<Option<IbmService>> {
        match self.load_account() {
            Err(IbmError::MissingToken) => {
                warn!("no IBM Quantum account configured");
                Ok(None)
            }
            Err(e) => Err(e.into()),
            Ok(account) => Self::login(&account).await.map(Some),
        }
    }

    /// Look up a backend by name: local simulators directly, anything else
    /// through the provider matching `filter`.
    pub async fn backend(&self, name: &str, filter: &InstanceFilter) -> Result<Arc<dyn Backend>> {
        if self.local.contains(name) {
            return Ok(self.local.get_backend(name).await?);
        }
        let service = self.connect().await?;
        let provider = service.get_provider(filter).await?;
        Ok(provider.get_backend(name).await?)
    }
}
