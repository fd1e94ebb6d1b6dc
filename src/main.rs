//! hostboard - host monitoring dashboard backend.
//!
//! Serves host up/down status and host registry management over a JSON API.

mod config;
mod registry;
mod status;
mod web;

use config::ServerConfig;
use registry::{HostRepository, RegistryStore};
use status::{StatusAggregator, StatusReader, SystemEnvironment};
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("hostboard=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting hostboard on port {}...", cfg.http_port);
    tracing::info!("Using host registry at {}", cfg.hosts_file.display());
    tracing::info!("Reading host status from {}", cfg.state_file.display());

    let store = RegistryStore::new(&cfg.hosts_file);
    let hosts = Arc::new(HostRepository::new(store.clone()));

    // A malformed registry is logged here but does not stop startup.
    match hosts.list() {
        Ok(list) => tracing::info!("Loaded {} hosts", list.len()),
        Err(e) => tracing::error!("Host registry {} is unreadable: {}", store.path().display(), e),
    }

    if let Some(dir) = &cfg.ui_dir {
        tracing::info!("Serving dashboard UI from {}", dir.display());
    }

    let status = Arc::new(StatusAggregator::new(
        store,
        StatusReader::new(&cfg.state_file),
        Arc::new(SystemEnvironment),
    ));

    // Start web server
    let server = Server::new(cfg, hosts, status);
    server.start().await?;

    Ok(())
}
