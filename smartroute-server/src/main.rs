use std::path::PathBuf;

use clap::Parser;
use smartroute_core::{RoutingService, loading::GraphConfig};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod state;

use config::ServerConfig;
use state::AppState;

/// HTTP route-planning server over a road graph
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Road graph JSON, overrides `graph.path` from the config
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Listen address, overrides `bind` from the config
    #[arg(short, long)]
    bind: Option<String>,

    /// Serve a synthetic grid when the graph file cannot be used
    #[arg(long)]
    fallback_grid: bool,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = match (&self.config, &self.graph) {
            (Some(path), _) => ServerConfig::from_file(path)?,
            (None, Some(graph)) => ServerConfig::new(GraphConfig::new(graph)),
            (None, None) => return Err("either --config or --graph is required".into()),
        };

        if let Some(graph) = self.graph {
            config.graph.path = graph;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if self.fallback_grid {
            config.graph.fallback_grid = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Args::parse().into_config()?;

    let graph_config = config.graph.clone();
    let service = tokio::task::spawn_blocking(move || RoutingService::load(&graph_config)).await??;
    let stats = service.stats();
    tracing::info!(
        nodes = stats.nodes,
        edges = stats.edges,
        "Road graph loaded from {}",
        config.graph.path.display()
    );

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app = routes::router(AppState::new(service, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
