//! `archiva-node` entry point.

use ac_03_chain_registry::prelude::ChainError;
use ac_04_lifecycle::prelude::LifecycleApi;
use ac_06_api_gateway::ApiGatewayService;
use anyhow::{Context, Result};
use node_runtime::telemetry::init_tracing;
use node_runtime::{NodeConfig, ServiceContainer, VERSION};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialise logging")?;
    info!(version = VERSION, "Starting Archiva node");

    let container = ServiceContainer::build(config).await?;

    match container.chain.verify_chain_id().await {
        Ok(()) => {}
        // The RPC node may come up later; chain calls fail until then.
        Err(ChainError::ChainUnavailable(detail)) => {
            warn!(%detail, "Chain unreachable at startup");
        }
        Err(err) => return Err(err).context("chain endpoint check failed"),
    }

    let report = container
        .orchestrator
        .recover()
        .await
        .context("failed to recover pending transitions")?;
    if !report.rescheduled.is_empty() {
        info!(count = report.rescheduled.len(), "Resumed pending archivals");
    }
    let pending = container.orchestrator.pending().await?.len();
    info!(pending, "Pending transitions after recovery");

    let service = ApiGatewayService::new(container.config.server.clone(), container.app_state())?;
    info!("Node is running. Press Ctrl+C to stop.");
    service
        .run(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Could not listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
