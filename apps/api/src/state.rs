use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::moveware::Moveware;
use crate::quotes::store::QuoteStore;
use crate::sync::store::JobStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The job and quote stores are trait objects so the sync and
/// acceptance cores can be exercised against in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jobs: Arc<dyn JobStore>,
    pub quotes: Arc<dyn QuoteStore>,
    /// Factory for per-company upstream clients.
    pub moveware: Moveware,
    /// Kept for handlers that need environment-derived settings.
    #[allow(dead_code)]
    pub config: Config,
}
