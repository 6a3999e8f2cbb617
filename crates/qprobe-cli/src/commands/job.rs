//! Job command implementation.

use anyhow::Result;
use console::style;

use qprobe_hal::{InstanceFilter, JobId};
use qprobe_tools::{JobRef, print_job, print_job_details, result_histograms, show_figure};

use super::common::Session;

/// Execute the job command.
pub async fn execute(
    session: &Session,
    job_id: &str,
    backend: &str,
    filter: &InstanceFilter,
    details: bool,
    histogram: bool,
) -> Result<()> {
    let backend = session.backend(backend, filter).await?;
    let job = backend.retrieve_job(&JobId::new(job_id)).await?;

    let mut out = std::io::stdout();
    print_job(JobRef::Handle(job.as_ref()), false, &mut out).await?;
    if !details && !histogram {
        return Ok(());
    }

    let result = job.result().await?;
    if details {
        print_job_details(&result, &mut out)?;
    }

    if histogram {
        let figures = result_histograms(&result)?;
        if figures.is_empty() {
            println!("{} Job {} has no counts to plot", style("○").dim(), job.job_id());
        }
        for mut figure in figures {
            println!();
            show_figure(&mut figure, &mut out)?;
        }
    }

    Ok(())
}
