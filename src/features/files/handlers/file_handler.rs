use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    AccessCountDto, DeleteFileResponseDto, FileContentDto, FileResponseDto, HotFilesQuery,
    SaveContentDto, UpdateFileDto, UploadFileDto,
};
use crate::features::files::services::{AccessTracker, FileService};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Shared state for the files routes
#[derive(Clone)]
pub struct FileState {
    pub file_service: Arc<FileService>,
    pub access_tracker: Arc<AccessTracker>,
    /// Maximum accepted upload size in bytes
    pub max_upload_size: usize,
}

/// List tracked files
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of tracked files, newest modified first", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    _user: AuthenticatedUser,
    State(state): State<FileState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    let (records, total) = state
        .file_service
        .list(query.offset(), query.limit())
        .await?;
    let dtos: Vec<FileResponseDto> = records.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// List the most accessed files
#[utoipa::path(
    get,
    path = "/api/files/hot",
    tag = "files",
    params(HotFilesQuery),
    responses(
        (status = 200, description = "Most accessed files", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_hot_files(
    _user: AuthenticatedUser,
    State(state): State<FileState>,
    Query(query): Query<HotFilesQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let records = state
        .file_service
        .list_hot(query.min_access, query.limit)
        .await?;
    let dtos: Vec<FileResponseDto> = records.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get one tracked file
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file(
    _user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let record = state.file_service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

/// Upload a file into the shared folder
///
/// Accepts multipart/form-data with a `file` field. The file is owned by the
/// uploader's team.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Invalid file or validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "User does not belong to a team"),
        (status = 409, description = "A file with this name is already tracked"),
        (status = 413, description = "File too large")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(state): State<FileState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let fname = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;

    if file_data.len() > state.max_upload_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {} bytes ({} MB)",
            state.max_upload_size,
            state.max_upload_size / 1024 / 1024
        )));
    }

    let record = state
        .file_service
        .upload(&user, &file_name, file_data)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(record.into()), None, None)),
    ))
}

/// Update file metadata
///
/// Only the owning team is writable. Requires admin, or manager of the
/// target team when the file is unassigned or already belongs to it.
#[utoipa::path(
    patch,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = UpdateFileDto,
    responses(
        (status = 200, description = "File updated", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not allowed to assign this file"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_file(
    user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFileDto>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let record = state
        .file_service
        .assign_team(&user, id, dto.team_id)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(record.into()),
        Some("File updated successfully".to_string()),
        None,
    )))
}

/// Delete a file from the shared folder and the catalog
///
/// Only a manager of the file's team (or an admin) can delete it.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = ApiResponse<DeleteFileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not authorized to delete this file"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    state.file_service.delete(&user, id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}

/// Record a read of the file
#[utoipa::path(
    post,
    path = "/api/files/{id}/access",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Access recorded", body = ApiResponse<AccessCountDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn record_access(
    _user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccessCountDto>>> {
    let access_count = state.access_tracker.record_access(id).await?;
    Ok(Json(ApiResponse::success(
        Some(AccessCountDto { id, access_count }),
        None,
        None,
    )))
}

/// Download the backing file
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File or backing file not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    _user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let (record, data) = state.file_service.download(id).await?;
    let base_name = record
        .file_name
        .rsplit('/')
        .next()
        .unwrap_or(&record.file_name)
        .replace('"', "");

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", base_name),
            ),
        ],
        data,
    )
        .into_response())
}

/// Read an editable file as text
#[utoipa::path(
    get,
    path = "/api/files/{id}/content",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", body = ApiResponse<FileContentDto>),
        (status = 400, description = "File type is not editable"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not a member of the file's team"),
        (status = 404, description = "File not found"),
        (status = 413, description = "File too large to edit")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_content(
    user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileContentDto>>> {
    let (record, content, size) = state.file_service.read_content(&user, id).await?;

    Ok(Json(ApiResponse::success(
        Some(FileContentDto {
            file_name: record.file_name,
            content,
            size,
        }),
        None,
        None,
    )))
}

/// Save edited text content
#[utoipa::path(
    put,
    path = "/api/files/{id}/content",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = SaveContentDto,
    responses(
        (status = 200, description = "Content saved", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "File type is not editable"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not a member of the file's team"),
        (status = 404, description = "File not found"),
        (status = 413, description = "Content too large")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_content(
    user: AuthenticatedUser,
    State(state): State<FileState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SaveContentDto>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let record = state
        .file_service
        .save_content(&user, id, &dto.content)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(record.into()),
        Some("Saved".to_string()),
        None,
    )))
}
