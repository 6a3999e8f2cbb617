//! Backends command implementation.

use anyhow::Result;

use qprobe_hal::{InstanceFilter, QuantumService};
use qprobe_tools::list_backends;

use super::common::Session;

/// Execute the backends command.
pub async fn execute(session: &Session, filter: &InstanceFilter) -> Result<()> {
    let service = session.try_connect().await?;
    let mut out = std::io::stdout();
    list_backends(
        session.local(),
        service.as_ref().map(|s| s as &dyn QuantumService),
        filter,
        &mut out,
    )
    .await?;
    Ok(())
}
