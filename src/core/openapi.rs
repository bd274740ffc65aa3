use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers, models as files_models};
use crate::features::sync::{dtos as sync_dtos, error as sync_error, handlers as sync_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Files
        files_handlers::list_files,
        files_handlers::list_hot_files,
        files_handlers::get_file,
        files_handlers::upload_file,
        files_handlers::update_file,
        files_handlers::delete_file,
        files_handlers::record_access,
        files_handlers::download_file,
        files_handlers::get_content,
        files_handlers::save_content,
        // Sync
        sync_handlers::run_sync,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            ApiResponse<auth::dto::MeResponseDto>,
            // Files
            files_models::Modifier,
            files_dtos::FileResponseDto,
            files_dtos::UploadFileDto,
            files_dtos::UpdateFileDto,
            files_dtos::AccessCountDto,
            files_dtos::FileContentDto,
            files_dtos::SaveContentDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            ApiResponse<files_dtos::AccessCountDto>,
            ApiResponse<files_dtos::FileContentDto>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            // Sync
            sync_error::FailureKind,
            sync_error::SyncFailure,
            sync_dtos::SyncRequestDto,
            sync_dtos::SyncResponseDto,
            ApiResponse<sync_dtos::SyncResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Current principal"),
        (name = "files", description = "Shared folder file catalog"),
        (name = "sync", description = "Reconciliation of the catalog with the shared folder (manager or admin)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Shared Folder API",
        version = "0.1.0",
        description = "File metadata catalog for the team shared folder",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
