//! NeonRealm Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p realm-gateway
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` when present).

use realm_common::{init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Gateway failed to start");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    if let Err(e) = init_tracing(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.gateway.address(),
        "Starting NeonRealm gateway"
    );

    realm_gateway::run(config).await?;

    Ok(())
}
