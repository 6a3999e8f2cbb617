//! Providers and the service that hands them out.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::Backend;
use crate::error::{HalError, HalResult};
use crate::instance::{Instance, InstanceFilter};

/// An account-scoped set of backends.
#[async_trait]
pub trait Provider: Send + Sync + fmt::Display {
    /// The instance this provider is scoped to. Local providers have none.
    fn instance(&self) -> Option<&Instance>;

    /// Whether this provider only serves simulators.
    fn is_simulator(&self) -> bool {
        false
    }

    /// All backends visible through this provider.
    async fn backends(&self) -> HalResult<Vec<Arc<dyn Backend>>>;

    /// Look up one backend by name.
    async fn get_backend(&self, name: &str) -> HalResult<Arc<dyn Backend>> {
        self.backends()
            .await?
            .into_iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| HalError::BackendNotFound(name.to_string()))
    }
}

/// A logged-in account on the quantum service.
#[async_trait]
pub trait QuantumService: Send + Sync {
    /// Instance to use when a lookup gives no constraints.
    fn default_instance(&self) -> Option<&Instance> {
        None
    }

    /// Providers whose instance matches `filter`.
    async fn providers(&self, filter: &InstanceFilter) -> HalResult<Vec<Arc<dyn Provider>>>;

    /// Exactly one provider matching `filter`.
    ///
    /// An empty filter resolves to the default instance when there is one.
    /// Fails when nothing matches or when the match is ambiguous.
    async fn get_provider(&self, filter: &InstanceFilter) -> HalResult<Arc<dyn Provider>> {
        let effective = match (filter.is_empty(), self.default_instance()) {
            (true, Some(default)) => InstanceFilter::from(default),
            _ => filter.clone(),
        };
        debug!("resolving provider for {effective}");

        let mut matches = self.providers(&effective).await?;
        match matches.len() {
            0 => Err(HalError::ProviderNotFound(effective.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(HalError::AmbiguousProvider {
                filter: effective.to_string(),
                candidates: matches
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider(Instance);

    impl fmt::Display for StubProvider {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Stub({})", self.0)
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn instance(&self) -> Option<&Instance> {
            Some(&self.0)
        }

        async fn backends(&self) -> HalResult<Vec<Arc<dyn Backend>>> {
            Ok(Vec::new())
        }
    }

    struct StubService {
        instances: Vec<Instance>,
        default: Option<Instance>,
    }

    #[async_trait]
    impl QuantumService for StubService {
        fn default_instance(&self) -> Option<&Instance> {
            self.default.as_ref()
        }

        async fn providers(&self, filter: &InstanceFilter) -> HalResult<Vec<Arc<dyn Provider>>> {
            Ok(self
                .instances
                .iter()
                .filter(|i| filter.matches(i))
                .map(|i| Arc::new(StubProvider(i.clone())) as Arc<dyn Provider>)
                .collect())
        }
    }

    fn service(default: Option<Instance>) -> StubService {
        StubService {
            instances: vec![
                Instance::new("ibm-q", "open", "main"),
                Instance::new("ibm-q-research", "uni", "qc"),
                Instance::new("ibm-q-research", "uni", "sim"),
            ],
            default,
        }
    }

    #[tokio::test]
    async fn test_get_provider_unique_match() {
        let svc = service(None);
        let provider = svc
            .get_provider(&InstanceFilter::any().with_hub("ibm-q"))
            .await
            .unwrap();
        assert_eq!(provider.instance().unwrap().project, "main");
    }

    #[tokio::test]
    async fn test_get_provider_ambiguous() {
        let svc = service(None);
        let err = svc
            .get_provider(&InstanceFilter::any().with_hub("ibm-q-research"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, HalError::AmbiguousProvider { .. }));
    }

    #[tokio::test]
    async fn test_get_provider_not_found() {
        let svc = service(None);
        let err = svc
            .get_provider(&InstanceFilter::any().with_hub("nobody"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, HalError::ProviderNotFound(_)));
    }

    #[tokio::test]
    async fn test_get_provider_empty_filter_uses_default() {
        let svc = service(Some(Instance::new("ibm-q-research", "uni", "qc")));
        let provider = svc.get_provider(&InstanceFilter::any()).await.unwrap();
        assert_eq!(provider.instance().unwrap().project, "qc");
    }

    #[tokio::test]
    async fn test_default_backend_lookup_not_found() {
        let provider = StubProvider(Instance::new("ibm-q", "open", "main"));
        let err = provider.get_backend("ibmq_lima").await.err().unwrap();
        assert!(matches!(err, HalError::BackendNotFound(name) if name == "ibmq_lima"));
    }
}
