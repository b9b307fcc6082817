use anyhow::Result;
use tracing::info;

use item_service::config::ServerConfig;
use item_service::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init_logging(&config.logging)?;

    info!("Starting item service with {:?}", config);
    let outcome = server::run(config).await?;
    info!("Shutdown outcome: {:?}", outcome);

    Ok(())
}
