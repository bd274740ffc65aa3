use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireManager;
use crate::features::sync::dtos::{SyncRequestDto, SyncResponseDto};
use crate::features::sync::services::SyncService;
use crate::shared::types::ApiResponse;

/// Reconcile the catalog with the shared folder
///
/// Requires manager or admin role. Runs against the same folder are serialized.
#[utoipa::path(
    post,
    path = "/api/admin/sync",
    tag = "sync",
    request_body = SyncRequestDto,
    responses(
        (status = 200, description = "Reconciliation finished", body = ApiResponse<SyncResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Manager access required"),
        (status = 500, description = "Shared folder is not configured or not accessible")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn run_sync(
    RequireManager(user): RequireManager,
    State(service): State<Arc<SyncService>>,
    body: Option<AppJson<SyncRequestDto>>,
) -> Result<Json<ApiResponse<SyncResponseDto>>> {
    let request = body.map(|AppJson(dto)| dto).unwrap_or_default();

    tracing::info!(
        "Sync requested by {}: create_missing={}, dry_run={}",
        user.sub,
        request.create_missing,
        request.dry_run
    );

    let report = service.run(request.create_missing, request.dry_run).await?;

    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
