use std::sync::Arc;

use colored::Colorize;
use robofleet_core::RobotRegistry;
use tracing::info;

pub async fn handle(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, path) = robofleet_config::load_config()?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let registry = Arc::new(RobotRegistry::with_robots(config.seed_robots()));
    info!(
        robots = registry.len().await,
        config = ?path,
        "Fleet registry initialized"
    );

    eprintln!(
        "{} http://{}",
        "RoboFleet API:".green().bold(),
        config.server.bind_address().cyan()
    );

    robofleet_api::run_server(&config.server, registry).await
}
