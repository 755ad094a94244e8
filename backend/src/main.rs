//! Service entry point: configuration, persistence wiring, and
//! signal-driven graceful shutdown.
//!
//! On SIGINT the service stops admitting requests, waits for the in-flight
//! count to reach zero, and only then stops the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::web;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use backend::domain::ports::UserRepository;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use backend::server::{AppConfig, DEFAULT_CONFIG_FILE, DrainCoordinator, create_server};

#[derive(Debug, Parser)]
#[command(about = "User registry HTTP service")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %err, "failed to initialise tracing subscriber");
    }

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config).map_err(std::io::Error::other)?;
    let bind_addr = config.bind_addr().map_err(std::io::Error::other)?;

    let pool = DbPool::open(
        PoolConfig::new(&config.database_url).with_max_size(config.pool_size),
    )
    .await
    .map_err(std::io::Error::other)?;
    let repository: Arc<dyn UserRepository> = Arc::new(DieselUserRepository::new(pool));

    let drain = Arc::new(DrainCoordinator::new());
    let http_state = web::Data::new(HttpState::new(repository, Arc::clone(&drain)));
    let health_state = web::Data::new(HealthState::new());

    let server = create_server(http_state, health_state.clone(), bind_addr)?;
    let handle = server.handle();
    let poll_interval = config.drain_poll();

    let shutdown = tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for shutdown signal");
            return;
        }
        info!("interrupt received; draining in-flight requests");
        health_state.mark_unhealthy();
        drain.stop_accepting();
        drain.drain(poll_interval).await;
        info!("drain complete; stopping server");
        handle.stop(true).await;
    });

    info!(%bind_addr, "user registry listening");
    let result = server.await;
    shutdown.abort();
    result
}
