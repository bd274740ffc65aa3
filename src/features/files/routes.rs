use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{self, FileState};
use crate::features::files::services::{AccessTracker, FileService};

/// Create routes for the files feature
pub fn routes(
    file_service: Arc<FileService>,
    access_tracker: Arc<AccessTracker>,
    max_upload_size: usize,
) -> Router {
    let state = FileState {
        file_service,
        access_tracker,
        max_upload_size,
    };

    Router::new()
        .route("/api/files", get(handlers::list_files))
        .route("/api/files/hot", get(handlers::list_hot_files))
        .route(
            "/api/files/upload",
            // Allow body size up to max_upload_size + buffer for multipart overhead
            post(handlers::upload_file)
                .layer(DefaultBodyLimit::max(max_upload_size + 1024 * 1024)),
        )
        .route(
            "/api/files/{id}",
            get(handlers::get_file)
                .patch(handlers::update_file)
                .delete(handlers::delete_file),
        )
        .route("/api/files/{id}/access", post(handlers::record_access))
        .route("/api/files/{id}/download", get(handlers::download_file))
        .route(
            "/api/files/{id}/content",
            get(handlers::get_content).put(handlers::save_content),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::models::NewFileRecord;
    use crate::features::files::repository::{FileRepository, InMemoryFileRepository};
    use crate::features::sync::engine::SyncLocks;
    use crate::modules::shared_folder::SharedFolder;
    use crate::shared::clock::SystemClock;
    use crate::shared::constants::{ROLE_MANAGER, ROLE_MEMBER};
    use crate::shared::test_helpers::{create_user, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::{json, Value};
    use uuid::Uuid;

    struct Harness {
        _dir: tempfile::TempDir,
        repo: Arc<InMemoryFileRepository>,
        router: Router,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(InMemoryFileRepository::new());
        let file_service = Arc::new(FileService::new(
            repo.clone(),
            SharedFolder::new(Some(dir.path().to_path_buf())),
            Arc::new(SystemClock),
            Arc::new(SyncLocks::new()),
            1024,
        ));
        let tracker = Arc::new(AccessTracker::new(repo.clone()));
        Harness {
            _dir: dir,
            repo,
            router: routes(file_service, tracker, 1024 * 1024),
        }
    }

    #[tokio::test]
    async fn test_list_requires_authentication() {
        let h = harness();
        let server = TestServer::new(h.router).unwrap();

        let response = server.get("/api/files").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_returns_total() {
        let h = harness();
        for name in ["a.txt", "b.txt", "c.txt"] {
            h.repo
                .insert(NewFileRecord::discovered(name.into(), 1, Utc::now()))
                .await
                .unwrap();
        }
        let user = create_user("ana", ROLE_MEMBER, None);
        let server = TestServer::new(with_user(h.router, user)).unwrap();

        let response = server
            .get("/api/files")
            .add_query_param("page_size", 2)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["meta"]["total"], 3);
    }

    #[tokio::test]
    async fn test_access_endpoint_counts() {
        let h = harness();
        let record = h
            .repo
            .insert(NewFileRecord::discovered("a.txt".into(), 1, Utc::now()))
            .await
            .unwrap();
        let user = create_user("ana", ROLE_MEMBER, None);
        let server = TestServer::new(with_user(h.router, user)).unwrap();

        server.post(&format!("/api/files/{}/access", record.id)).await;
        let response = server.post(&format!("/api/files/{}/access", record.id)).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["access_count"], 2);
    }

    #[tokio::test]
    async fn test_access_unknown_file_is_404() {
        let h = harness();
        let user = create_user("ana", ROLE_MEMBER, None);
        let server = TestServer::new(with_user(h.router, user)).unwrap();

        let response = server
            .post(&format!("/api/files/{}/access", Uuid::new_v4()))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_assigns_team_and_serializes_modifier() {
        let h = harness();
        let team = Uuid::new_v4();
        let record = h
            .repo
            .insert(NewFileRecord::discovered("scan.pdf".into(), 1, Utc::now()))
            .await
            .unwrap();
        let manager = create_user("cy", ROLE_MANAGER, Some(team));
        let server = TestServer::new(with_user(h.router, manager)).unwrap();

        let response = server
            .patch(&format!("/api/files/{}", record.id))
            .json(&json!({ "team_id": team }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["team_id"], json!(team));
        assert_eq!(
            body["data"]["modified_by"],
            json!({"kind": "attributed", "user_id": "cy"})
        );
    }

    #[tokio::test]
    async fn test_discovered_file_reports_external_modifier() {
        let h = harness();
        let record = h
            .repo
            .insert(NewFileRecord::discovered("scan.pdf".into(), 1, Utc::now()))
            .await
            .unwrap();
        let user = create_user("ana", ROLE_MEMBER, None);
        let server = TestServer::new(with_user(h.router, user)).unwrap();

        let response = server.get(&format!("/api/files/{}", record.id)).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["modified_by"], json!({"kind": "external"}));
        assert_eq!(body["data"]["uploaded_by"], Value::Null);
    }

    #[tokio::test]
    async fn test_hot_files_rejects_bad_limit() {
        let h = harness();
        let user = create_user("ana", ROLE_MEMBER, None);
        let server = TestServer::new(with_user(h.router, user)).unwrap();

        let response = server
            .get("/api/files/hot")
            .add_query_param("limit", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
