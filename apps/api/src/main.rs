mod config;
mod db;
mod errors;
mod middleware;
mod models;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::recommendation::pg_source::PgCatalogSource;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting course recommender v{}", env!("CARGO_PKG_VERSION"));

    let weight_sum = config.scoring.weights.sum();
    if (weight_sum - 1.0).abs() > 1e-6 {
        warn!("Scoring weights sum to {weight_sum:.4}, not 1.0");
    }
    info!(
        top_k_similar = config.scoring.top_k_similar,
        top_n_role = config.scoring.top_n_role,
        prior_m = config.scoring.prior_m,
        "Scoring config loaded"
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    let state = AppState {
        catalog: Arc::new(PgCatalogSource::new(db)),
        scoring: config.scoring,
    };

    let app = build_router(state).layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
