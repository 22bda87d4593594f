use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use metro_server::cache::RouteCache;
use metro_server::config::ServerConfig;
use metro_server::network::{LineDefinitions, Network};
use metro_server::planner::RouteConfig;
use metro_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "metro server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from_env()?;
    let route_config = RouteConfig::from_env()?;

    let defs = LineDefinitions::load_from_path(&server_config.dataset_path)?;
    let network = Network::build(&defs, &route_config.network_params());
    let route_config = route_config.for_network(&network);

    info!(
        lines = network.lines().len(),
        stations = network.station_count(),
        search_mode = %route_config.search_mode,
        "network ready"
    );

    let cache = RouteCache::new(&server_config.cache);
    let state = AppState::new(network, route_config, cache);
    let app = create_router(
        state,
        &server_config.static_dir,
        server_config.request_timeout,
    );

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    info!(addr = %server_config.bind_addr, "metro route planner listening");
    info!("  GET  /                    - Route form");
    info!("  GET  /health              - Health check");
    info!("  GET  /api/lines           - Lines and stations");
    info!("  GET  /api/stations/search - Search stations");
    info!("  POST /route               - Plan a route");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
