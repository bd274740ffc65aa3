use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::sync::handlers;
use crate::features::sync::services::SyncService;

/// Create routes for the sync feature
pub fn routes(sync_service: Arc<SyncService>) -> Router {
    Router::new()
        .route("/api/admin/sync", post(handlers::run_sync))
        .with_state(sync_service)
}
