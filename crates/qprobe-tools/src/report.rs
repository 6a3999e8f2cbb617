//! Backend and job reports.
//!
//! Reports write human-readable text to any [`Write`] sink. Nothing is
//! caught locally: a failing status, properties, job or result query aborts
//! the whole report with its [`HalError`](qprobe_hal::HalError).

use std::io::Write;

use serde_json::{Map, Value};
use tracing::debug;

use qprobe_hal::{Backend, BackendConfiguration, HalResult, Job, JobId, JobResult};

use crate::format::{display_value, format_counts};

/// Switches for the optional sections of a backend report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Include per-gate calibration data.
    pub output_gate_props: bool,
    /// Include per-qubit calibration data.
    pub output_qubit_props: bool,
    /// Include the backend's recent jobs.
    pub output_job_info: bool,
}

impl ReportOptions {
    /// All sections enabled.
    pub fn all() -> Self {
        Self {
            output_gate_props: true,
            output_qubit_props: true,
            output_job_info: true,
        }
    }
}

fn write_entry(out: &mut dyn Write, key: &str, value: &Value) -> std::io::Result<()> {
    writeln!(out, "   {key:<30}: {}", display_value(value))
}

/// Nested `<key:10>: <value>` lines for one gate or qubit entry.
fn write_nested(out: &mut dyn Write, label: &str, entry: &Value) -> std::io::Result<()> {
    writeln!(out, "      {label}:")?;
    if let Value::Object(fields) = entry {
        for (key, value) in fields {
            writeln!(out, "         {key:<10}: {}", display_value(value))?;
        }
    }
    Ok(())
}

fn write_gate_list(out: &mut dyn Write, gates: &Value) -> std::io::Result<()> {
    writeln!(out, "   gates:")?;
    for gate in gates.as_array().into_iter().flatten() {
        write_nested(out, "gate", gate)?;
    }
    Ok(())
}

fn write_configuration(out: &mut dyn Write, config: &BackendConfiguration) -> std::io::Result<()> {
    writeln!(out, "Configuration info:")?;
    for (key, value) in config.to_dict() {
        match key.as_str() {
            "gates" => write_gate_list(out, value)?,
            "basis_gates" => {
                writeln!(out, "   basic gates:")?;
                writeln!(out, "     {}", config.basis_gates().join(", "))?;
            }
            _ => write_entry(out, key, value)?,
        }
    }
    Ok(())
}

fn write_properties(
    out: &mut dyn Write,
    props: &Map<String, Value>,
    options: &ReportOptions,
) -> std::io::Result<()> {
    writeln!(out, "Property info:")?;
    for (key, value) in props {
        match key.as_str() {
            "gates" => {
                if options.output_gate_props {
                    write_gate_list(out, value)?;
                }
            }
            "qubits" => {
                if options.output_qubit_props {
                    writeln!(out, "   qubits:")?;
                    // One list of calibration entries per qubit.
                    for qubit in value.as_array().into_iter().flatten() {
                        for entry in qubit.as_array().into_iter().flatten() {
                            write_nested(out, "qubit", entry)?;
                        }
                    }
                }
            }
            _ => write_entry(out, key, value)?,
        }
    }
    Ok(())
}

/// Print the status, configuration and calibration data of a backend.
pub async fn print_backend(
    backend: &dyn Backend,
    options: &ReportOptions,
    out: &mut dyn Write,
) -> HalResult<()> {
    debug!("reporting on backend {backend}");

    writeln!(out, "Provider: {}", backend.provider_name())?;
    writeln!(out, "Name: {}", backend.name())?;
    if let Some(instance) = backend.instance() {
        writeln!(out, "Hub: {}", instance.hub)?;
        writeln!(out, "Group: {}", instance.group)?;
        writeln!(out, "Project: {}", instance.project)?;
    }

    writeln!(out, "Status info:")?;
    let status = backend.status().await?;
    for (key, value) in &status.to_dict() {
        write_entry(out, key, value)?;
    }

    write_configuration(out, backend.configuration())?;

    if let Some(props) = backend.properties().await? {
        write_properties(out, props.to_dict(), options)?;
    }

    if options.output_job_info {
        let jobs = backend.jobs().await?;
        if !jobs.is_empty() {
            writeln!(out, "Jobs:")?;
            for job in &jobs {
                print_job(JobRef::Handle(job.as_ref()), false, out).await?;
            }
        }
    }

    Ok(())
}

/// The job to report on.
pub enum JobRef<'a> {
    /// A job handle already at hand.
    Handle(&'a dyn Job),
    /// A job to re-fetch from the backend it ran on.
    Id {
        /// Job to fetch.
        job_id: &'a JobId,
        /// Backend the job ran on.
        backend: &'a dyn Backend,
    },
}

/// Print a job's identity, and optionally its result details and counts.
///
/// Counts are printed only when the result reports `status == "COMPLETED"`
/// and `success == true`.
pub async fn print_job(
    job: JobRef<'_>,
    output_job_details: bool,
    out: &mut dyn Write,
) -> HalResult<()> {
    let fetched;
    let job: &dyn Job = match job {
        JobRef::Handle(job) => job,
        JobRef::Id { job_id, backend } => {
            debug!("retrieving job {job_id} from {backend}");
            fetched = backend.retrieve_job(job_id).await?;
            fetched.as_ref()
        }
    };

    writeln!(out, "Job: {job}")?;
    writeln!(out, "   id: {}", job.job_id())?;
    writeln!(out, "   status: {}", job.status().await?)?;
    writeln!(out, "   run on backend: {}", job.backend_name())?;
    match job.creation_date() {
        Some(date) => writeln!(out, "   creation date: {}", date.to_rfc3339())?,
        None => writeln!(out, "   creation date: unknown")?,
    }

    if !output_job_details {
        return Ok(());
    }

    let result = job.result().await?;
    print_job_details(&result, out)
}

/// Print the top-level fields of a job result, then per-circuit counts.
///
/// Counts are printed only when [`JobResult::is_successful`] holds.
pub fn print_job_details(result: &JobResult, out: &mut dyn Write) -> HalResult<()> {
    writeln!(out, "   Job details:")?;
    for (key, value) in result.to_dict() {
        if key == "results" {
            continue;
        }
        writeln!(out, "      {key}: {}", display_value(value))?;
    }

    if result.is_successful() {
        for experiment in result.experiments()? {
            writeln!(out, "         Circuit: {}", experiment.header.name)?;
            for (state, count) in format_counts(&experiment.data.counts, &experiment.header) {
                writeln!(out, "            state: {state:<10}: counts: {count:>10}")?;
            }
        }
    } else {
        debug!("job result not completed successfully, skipping counts");
    }

    Ok(())
}
