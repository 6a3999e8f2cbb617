//! qprobe command-line interface.
//!
//! Inspect IBM Quantum backends and jobs from the terminal:
//!
//! ```text
//! qprobe backends                          list local simulators and cloud backends
//! qprobe backend ibmq_lima --qubits        report on one backend
//! qprobe jobs ibmq_lima                    recent jobs of a backend
//! qprobe job <id> --backend ibmq_lima -d   one job with result details
//! qprobe select --min-qubits 5             pick the least-busy device
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use qprobe_hal::InstanceFilter;

mod commands;

use commands::common::Session;
use commands::{backend, backends, job, jobs, select, version};

/// qprobe - inspect IBM Quantum backends, jobs and results
#[derive(Parser)]
#[command(name = "qprobe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Saved account file (defaults to ~/.qiskit/qiskit-ibm.json)
    #[arg(long, env = "QPROBE_ACCOUNT", global = true)]
    account: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Provider scope shared by the cloud commands.
#[derive(Args, Debug, Clone, Default)]
struct InstanceArgs {
    /// Hub name
    #[arg(long)]
    hub: Option<String>,

    /// Group name
    #[arg(long)]
    group: Option<String>,

    /// Project name
    #[arg(long)]
    project: Option<String>,
}

impl InstanceArgs {
    fn filter(&self) -> InstanceFilter {
        InstanceFilter {
            hub: self.hub.clone(),
            group: self.group.clone(),
            project: self.project.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List local simulators and every cloud backend
    Backends {
        #[command(flatten)]
        instance: InstanceArgs,
    },

    /// Report status, configuration and calibration data of a backend
    Backend {
        /// Backend name
        name: String,

        #[command(flatten)]
        instance: InstanceArgs,

        /// Include per-gate calibration data
        #[arg(long)]
        gates: bool,

        /// Include per-qubit calibration data
        #[arg(long)]
        qubits: bool,

        /// Include recent jobs
        #[arg(long)]
        jobs: bool,
    },

    /// List recent jobs of a backend
    Jobs {
        /// Backend name
        backend: String,

        #[command(flatten)]
        instance: InstanceArgs,
    },

    /// Report on a single job
    Job {
        /// Job ID
        job_id: String,

        /// Backend the job ran on
        #[arg(short, long)]
        backend: String,

        #[command(flatten)]
        instance: InstanceArgs,

        /// Include result details and counts
        #[arg(short, long)]
        details: bool,

        /// Draw a histogram of the counts of each circuit
        #[arg(long)]
        histogram: bool,
    },

    /// Select a backend by simple criteria
    Select {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Backend name
        #[arg(short, long)]
        name: Option<String>,

        /// Use a simulator
        #[arg(long)]
        sim: bool,

        /// Use the cloud simulator
        #[arg(long)]
        cloud_sim: bool,

        /// Minimum number of qubits
        #[arg(long, default_value = "1")]
        min_qubits: u32,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let session = Session::new(cli.account);

    // Execute command
    let result = match cli.command {
        Commands::Backends { instance } => backends::execute(&session, &instance.filter()).await,

        Commands::Backend {
            name,
            instance,
            gates,
            qubits,
            jobs,
        } => backend::execute(&session, &name, &instance.filter(), gates, qubits, jobs).await,

        Commands::Jobs { backend, instance } => {
            jobs::execute(&session, &backend, &instance.filter()).await
        }

        Commands::Job {
            job_id,
            backend,
            instance,
            details,
            histogram,
        } => {
            job::execute(
                &session,
                &job_id,
                &backend,
                &instance.filter(),
                details,
                histogram,
            )
            .await
        }

        Commands::Select {
            instance,
            name,
            sim,
            cloud_sim,
            min_qubits,
        } => select::execute(&session, instance.filter(), name, sim, cloud_sim, min_qubits).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
