//! curve-headless - drives the curve session state machine without a browser.

mod autopilot;
mod config;
mod driver;
mod transport;

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::HeadlessConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Native Curve headless client v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::var_os("CURVE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("curve.toml"));
    let config = HeadlessConfig::load(&path)?;
    info!(
        server = %config.server_url,
        auto_join = config.auto_join,
        auto_ready = config.auto_ready,
        steer = config.steer.as_str(),
        "configuration loaded from {}",
        path.display()
    );

    driver::run(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    info!("Shutting down");
    Ok(())
}
