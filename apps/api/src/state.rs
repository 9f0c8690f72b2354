use std::sync::Arc;

use crate::recommendation::source::CatalogSource;
use crate::recommendation::weights::ScoringConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only catalog queries. Postgres in production, in-memory in tests.
    pub catalog: Arc<dyn CatalogSource>,
    pub scoring: ScoringConfig,
}
