//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - IBM Quantum backend and job inspection",
        style("qprobe").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qprobe-hal          Backend, provider and job abstractions");
    println!("  qprobe-tools        Reports, listings and backend selection");
    println!("  qprobe-adapter-ibm  IBM Quantum REST client");
    println!("  qprobe-adapter-sim  Local simulators");
    println!("  qprobe-cli          Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
