//! Backend command implementation.

use anyhow::Result;

use qprobe_hal::InstanceFilter;
use qprobe_tools::{ReportOptions, print_backend};

use super::common::Session;

/// Execute the backend command.
pub async fn execute(
    session: &Session,
    name: &str,
    filter: &InstanceFilter,
    gates: bool,
    qubits: bool,
    jobs: bool,
) -> Result<()> {
    let backend = session.backend(name, filter).await?;
    let options = ReportOptions {
        output_gate_props: gates,
        output_qubit_props: qubits,
        output_job_info: jobs,
    };
    let mut out = std::io::stdout();
    print_backend(backend.as_ref(), &options, &mut out).await?;
    Ok(())
}
