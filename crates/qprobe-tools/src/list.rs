//! Backend and job listings.

use std::io::Write;

use tracing::{debug, warn};

use qprobe_hal::{
    Backend, HalResult, InstanceFilter, Job, LOCAL_SIMULATORS, Provider, QuantumService,
};

use crate::report::{ReportOptions, print_backend};

fn provider_banner(out: &mut dyn Write, provider: &dyn Provider) -> std::io::Result<()> {
    writeln!(out, "\n---------------- Provider: {provider} ----------------")
}

fn backend_banner(out: &mut dyn Write, backend: &dyn Backend) -> std::io::Result<()> {
    writeln!(out, "\t----------- Backend: {backend} ----------------")
}

/// List the local simulators, then every cloud backend visible through
/// providers matching `filter`.
///
/// Cloud backends get a full report with no optional sections. The cloud
/// part is skipped when no service is available.
pub async fn list_backends(
    local: &dyn Provider,
    service: Option<&dyn QuantumService>,
    filter: &InstanceFilter,
    out: &mut dyn Write,
) -> HalResult<()> {
    writeln!(out, "\n---------------- Local simulators: ----------------")?;
    for name in LOCAL_SIMULATORS {
        let sim = local.get_backend(name).await?;
        backend_banner(out, sim.as_ref())?;
    }

    let Some(service) = service else {
        warn!("no IBM Quantum account loaded, skipping cloud backends");
        return Ok(());
    };

    let options = ReportOptions::default();
    for provider in service.providers(filter).await? {
        if provider.is_simulator() {
            provider_banner(out, provider.as_ref())?;
            continue;
        }
        for backend in provider.backends().await? {
            provider_banner(out, provider.as_ref())?;
            backend_banner(out, backend.as_ref())?;
            print_backend(backend.as_ref(), &options, out).await?;
        }
    }
    Ok(())
}

/// The backend's recent jobs, or `None` when it has none.
pub async fn get_list_of_jobs(backend: &dyn Backend) -> HalResult<Option<Vec<Box<dyn Job>>>> {
    debug!("listing jobs of backend {backend}");
    let jobs = backend.jobs().await?;
    Ok((!jobs.is_empty()).then_some(jobs))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::{FakeBackend, FakeJob, FakeProvider, FakeService};
    use qprobe_adapter_sim::LocalSimulators;
    use qprobe_hal::Instance;

    fn service() -> FakeService {
        FakeService::new(vec![
            FakeProvider::new(
                Instance::new("ibm-q", "open", "main"),
                vec![
                    Arc::new(FakeBackend::device("ibmq_lima", 5, 2, true)),
                    Arc::new(FakeBackend::device("ibmq_quito", 5, 9, true)),
                ],
            ),
            FakeProvider::new(Instance::new("ibm-q", "open", "sims"), Vec::new()).simulator(),
            FakeProvider::new(
                Instance::new("ibm-q-research", "uni", "qc"),
                vec![Arc::new(FakeBackend::device("ibmq_toronto", 27, 0, true))],
            ),
        ])
    }

    async fn render(service: Option<&dyn QuantumService>, filter: &InstanceFilter) -> String {
        let local = LocalSimulators::new();
        let mut out = Vec::new();
        list_backends(&local, service, filter, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_local_simulators_listed_before_providers() {
        let svc = service();
        let text = render(Some(&svc as &dyn QuantumService), &InstanceFilter::any()).await;

        let expected_head = "\n---------------- Local simulators: ----------------\n\
            \t----------- Backend: statevector_simulator ----------------\n\
            \t----------- Backend: unitary_simulator ----------------\n\
            \t----------- Backend: qasm_simulator ----------------\n";
        assert!(text.starts_with(expected_head));

        let first_provider = text.find("Provider:").unwrap();
        assert!(first_provider > text.find("qasm_simulator").unwrap());
    }

    #[tokio::test]
    async fn test_provider_banner_per_backend() {
        let svc = service();
        let text = render(Some(&svc as &dyn QuantumService), &InstanceFilter::any()).await;

        assert_eq!(
            text.matches("---------------- Provider: Fake(ibm-q/open/main) ----------------")
                .count(),
            2
        );
        assert!(text.contains("\t----------- Backend: ibmq_quito ----------------\nProvider: "));
        assert_eq!(text.matches("Status info:").count(), 3);
    }

    #[tokio::test]
    async fn test_simulator_provider_prints_banner_only() {
        let svc = service();
        let filter = InstanceFilter::any().with_project("sims");
        let text = render(Some(&svc as &dyn QuantumService), &filter).await;
        assert!(text.contains("---------------- Provider: Fake(ibm-q/open/sims) ----------------"));
        assert!(!text.contains("Status info:"));
    }

    #[tokio::test]
    async fn test_filter_restricts_providers() {
        let svc = service();
        let filter = InstanceFilter::any().with_hub("ibm-q-research");
        let text = render(Some(&svc as &dyn QuantumService), &filter).await;
        assert!(text.contains("ibmq_toronto"));
        assert!(!text.contains("ibmq_lima"));
    }

    #[tokio::test]
    async fn test_without_service_lists_local_only() {
        let text = render(None, &InstanceFilter::any()).await;
        assert_eq!(text.matches("Backend:").count(), 3);
        assert!(!text.contains("Provider:"));
    }

    #[tokio::test]
    async fn test_get_list_of_jobs() {
        let empty = FakeBackend::device("ibmq_lima", 5, 0, true);
        assert!(get_list_of_jobs(&empty).await.unwrap().is_none());

        let busy = FakeBackend::device("ibmq_lima", 5, 0, true).with_jobs(vec![
            FakeJob::completed("a", "ibmq_lima"),
            FakeJob::completed("b", "ibmq_lima"),
        ]);
        let jobs = get_list_of_jobs(&busy).await.unwrap().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].job_id().0, "b");
    }
}
