//! Select command implementation.

use anyhow::Result;

use qprobe_hal::{InstanceFilter, QuantumService};
use qprobe_tools::{BackendQuery, get_backend};

use super::common::Session;

/// Execute the select command.
pub async fn execute(
    session: &Session,
    instance: InstanceFilter,
    name: Option<String>,
    sim: bool,
    cloud_sim: bool,
    min_qubits: u32,
) -> Result<()> {
    let query = BackendQuery {
        instance,
        backend_name: name,
        use_sim: sim,
        use_cloud_sim: cloud_sim,
        min_qubits,
    };

    let service = if query.needs_cloud() {
        Some(session.connect().await?)
    } else {
        None
    };

    let backend = get_backend(
        &query,
        service.as_ref().map(|s| s as &dyn QuantumService),
        session.local(),
    )
    .await?;
    println!("Got backend: {backend}");
    Ok(())
}
