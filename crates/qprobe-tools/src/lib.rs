//! Reporting, listing and selection over qprobe backends.
//!
//! Everything here reads objects owned by a quantum service through the
//! [`qprobe_hal`] traits and either prints them or picks one:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`report`] | Backend and job reports |
//! | [`list`] | Backend banner listing, job listing |
//! | [`select`] | Backend selection (simulator, by name, least-busy) |
//! | [`format`] | Value rendering and measurement-count formatting |
//! | [`figure`] | Terminal bar charts |
//!
//! # Example
//!
//! ```ignore
//! use qprobe_adapter_sim::LocalSimulators;
//! use qprobe_tools::select::{BackendQuery, get_backend};
//! use qprobe_tools::report::{ReportOptions, print_backend};
//!
//! let local = LocalSimulators::new();
//! let backend = get_backend(&BackendQuery::new().local_sim(), None, &local).await?;
//! print_backend(backend.as_ref(), &ReportOptions::default(), &mut std::io::stdout()).await?;
//! ```

pub mod figure;
pub mod format;
pub mod list;
pub mod report;
pub mod select;

#[cfg(test)]
mod testing;

pub use figure::{Canvas, Figure, counts_histogram, result_histograms, show_figure};
pub use format::{display_value, format_counts};
pub use list::{get_list_of_jobs, list_backends};
pub use report::{JobRef, ReportOptions, print_backend, print_job, print_job_details};
pub use select::{BackendQuery, Resolved, get_backend, least_busy};
