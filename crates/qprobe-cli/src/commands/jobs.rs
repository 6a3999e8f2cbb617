//! Jobs command implementation.

use anyhow::Result;
use console::style;

use qprobe_hal::InstanceFilter;
use qprobe_tools::{JobRef, get_list_of_jobs, print_job};

use super::common::Session;

/// Execute the jobs command.
pub async fn execute(session: &Session, backend: &str, filter: &InstanceFilter) -> Result<()> {
    let backend = session.backend(backend, filter).await?;

    let Some(jobs) = get_list_of_jobs(backend.as_ref()).await? else {
        println!("{} No jobs found on {}", style("○").dim(), style(&backend).bold());
        return Ok(());
    };

    let mut out = std::io::stdout();
    for job in &jobs {
        print_job(JobRef::Handle(job.as_ref()), false, &mut out).await?;
    }
    Ok(())
}
