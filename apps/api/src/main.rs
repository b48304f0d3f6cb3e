mod config;
mod costings;
mod db;
mod errors;
mod models;
mod moveware;
mod quotes;
mod routes;
mod settings;
mod state;
mod sync;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::moveware::{Moveware, MovewareConfig};
use crate::quotes::store::PgQuoteStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::sync::store::PgJobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a malformed environment)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quote Portal API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply embedded migrations
    let db = create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&db).await?;
    info!("Database migrations applied");

    // Upstream client factory. Credentials are validated per request so a
    // partially-configured instance can still serve cached data.
    let moveware = Moveware::new(MovewareConfig {
        base_url: config.moveware_api_url.clone(),
        username: config.moveware_username.clone(),
        password: config.moveware_password.clone(),
        version: config.moveware_api_version.clone(),
    });

    // Build app state
    let state = AppState {
        db: db.clone(),
        jobs: Arc::new(PgJobStore::new(db.clone())),
        quotes: Arc::new(PgQuoteStore::new(db)),
        moveware,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
