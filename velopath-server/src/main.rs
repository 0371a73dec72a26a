//! HTTP server for bicycle route queries over a prepared street network.

mod api;
mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use velopath_core::prelude::*;

use crate::api::AppState;
use crate::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(about = "Bicycle routing server with grade- and crash-aware costs")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "velopath.toml")]
    config: PathBuf,

    /// Override the listen address from the config file
    #[arg(long)]
    addr: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("velopath_server=info".parse()?)
                .add_directive("velopath_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(&args.config)?;
    if let Some(addr) = args.addr {
        config.listen = addr;
    }

    let state = Arc::new(build_state(&config)?);

    let app = api::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_s,
        )));

    tracing::info!("listening on {}", config.listen);
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Load the network, run the derivation stages that have inputs
/// configured, then freeze the routing model.
fn build_state(config: &ServerConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    tracing::info!("loading network from {}", config.network.display());
    let store = load_store(&config.network, config.incidents.as_deref())?;

    match &config.terrain {
        Some(path) => {
            tracing::info!("deriving elevation grades from {}", path.display());
            let terrain = GridTerrain::from_ascii_grid(path)?;
            let summary = derive_elevation_grades(&store, &terrain, &config.terrain_source)?;
            tracing::info!(
                "derived grades for {} edges, {} skipped",
                summary.derived,
                summary.skipped
            );
        }
        None => tracing::warn!("no terrain raster configured, routing without grades"),
    }

    if config.incidents.is_some() {
        let params = CrashLinkParams {
            max_distance_m: config.crash_link_distance_m,
            max_edges_per_incident: config.crash_link_max_edges,
        };
        let summary = link_crash_incidents(&store, &params)?;
        tracing::info!(
            "linked {} incidents ({} links, {} skipped)",
            summary.incidents_linked,
            summary.links,
            summary.incidents_skipped
        );
    }

    Ok(AppState {
        model: RoutingModel::new(store),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
