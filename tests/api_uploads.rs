//! Integration tests per gli upload multipart
//!
//! Test per:
//! - POST /api/internal/uploads/image, GET /api/internal/uploads/images
//! - POST/GET /api/frontend/resumes, GET /api/internal/resumes

mod common;

#[cfg(test)]
mod upload_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::Value;
    use sqlx::MySqlPool;
    use std::path::PathBuf;
    use std::sync::Arc;
    use uniportal::entities::Role;
    use uniportal::external::LocalStorage;

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];
    const PDF_BYTES: &[u8] = b"%PDF-1.4\n%fake resume\n";

    fn file_form(bytes: &[u8], file_name: &str, mime: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(bytes.to_vec()).file_name(file_name).mime_type(mime),
        )
    }

    async fn server_with_dir(pool: MySqlPool) -> (axum_test::TestServer, PathBuf) {
        let dir = test_dir();
        let storage = Arc::new(LocalStorage::new(dir.join("uploads"), "http://cdn.test/uploads"));
        let state = create_test_state_with(pool, storage, ScriptedCrm::accepting(), dir.clone()).await;
        (create_test_server(state), dir)
    }

    // ============================================================
    // Immagini
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_upload_image_is_stored_and_recorded(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, dir) = server_with_dir(pool).await;

        let response = server
            .post("/api/internal/uploads/image")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .multipart(file_form(PNG_BYTES, "campus.PNG", "image/png"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let key = body["data"]["key"].as_str().unwrap().to_string();
        assert!(key.starts_with("images/"));
        assert!(key.ends_with(".png"));
        assert_eq!(body["data"]["url"], format!("http://cdn.test/uploads/{}", key));
        assert_eq!(body["data"]["size"], PNG_BYTES.len());
        assert!(dir.join("uploads").join(&key).exists());

        let listed = server
            .get("/api/internal/uploads/images")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        listed.assert_status_ok();
        let body: Value = listed.json();
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["key"], key);
        assert_eq!(records[0]["file_name"], "campus.PNG");
        assert_eq!(records[0]["uploaded_by"], ADMIN_ID);
        assert_eq!(body["pagination"]["totalItems"], 1);

        // il registro sopravvive su disco
        assert!(dir.join("uploaded_images.json").exists());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_image_list_is_paginated(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, _dir) = server_with_dir(pool).await;

        for name in ["a.png", "b.png", "c.png"] {
            server
                .post("/api/internal/uploads/image")
                .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
                .multipart(file_form(PNG_BYTES, name, "image/png"))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/internal/uploads/images")
            .add_query_param("page", 2)
            .add_query_param("limit", 2)
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["file_name"], "a.png");
        assert_eq!(body["pagination"]["currentPage"], 2);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["pagination"]["totalItems"], 3);
        assert_eq!(body["pagination"]["hasNextPage"], false);
        assert_eq!(body["pagination"]["hasPrevPage"], true);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_upload_image_rejects_other_types(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, _dir) = server_with_dir(pool).await;

        let response = server
            .post("/api/internal/uploads/image")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .multipart(file_form(b"<svg/>", "logo.svg", "image/svg+xml"))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"], "Unsupported file type");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_upload_without_file(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, _dir) = server_with_dir(pool).await;

        let response = server
            .post("/api/internal/uploads/image")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .multipart(MultipartForm::new().add_text("caption", "no file here"))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"], "No file provided");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_upload_empty_and_oversized_files(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, _dir) = server_with_dir(pool).await;

        server
            .post("/api/internal/uploads/image")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .multipart(file_form(&[], "empty.png", "image/png"))
            .await
            .assert_status_bad_request();

        let oversized = vec![0u8; 1024 * 1024 + 1];
        let response = server
            .post("/api/internal/uploads/image")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .multipart(file_form(&oversized, "huge.png", "image/png"))
            .await;
        assert!(response.status_code().is_client_error());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_image_upload_is_admin_only(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, _dir) = server_with_dir(pool).await;

        server
            .post("/api/internal/uploads/image")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .multipart(file_form(PNG_BYTES, "campus.png", "image/png"))
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    // ============================================================
    // CV
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_student_uploads_resume(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, dir) = server_with_dir(pool).await;

        let response = server
            .post("/api/frontend/resumes")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .multipart(file_form(PDF_BYTES, "asha-rao-cv.pdf", "application/pdf"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["user_id"], STUDENT_ID);
        assert_eq!(body["data"]["file_name"], "asha-rao-cv.pdf");
        let key = body["data"]["object_key"].as_str().unwrap().to_string();
        assert!(key.starts_with("resumes/"));
        assert!(dir.join("uploads").join(&key).exists());

        let mine = server
            .get("/api/frontend/resumes")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await;
        mine.assert_status_ok();
        assert_eq!(mine.json::<Value>()["pagination"]["totalItems"], 1);

        let theirs = server
            .get("/api/frontend/resumes")
            .add_header(authorization(), bearer(OTHER_STUDENT_ID, Role::Student))
            .await;
        assert_eq!(theirs.json::<Value>()["pagination"]["totalItems"], 0);

        let all = server
            .get("/api/internal/resumes")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        let body: Value = all.json();
        assert_eq!(body["pagination"]["totalItems"], 1);
        assert_eq!(body["data"][0]["url"], format!("http://cdn.test/uploads/{}", key));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_resume_rejects_images(pool: MySqlPool) -> sqlx::Result<()> {
        let (server, _dir) = server_with_dir(pool).await;

        server
            .post("/api/frontend/resumes")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .multipart(file_form(PNG_BYTES, "selfie.png", "image/png"))
            .await
            .assert_status_bad_request();

        server
            .post("/api/frontend/resumes")
            .multipart(file_form(PDF_BYTES, "cv.pdf", "application/pdf"))
            .await
            .assert_status_unauthorized();
        Ok(())
    }
}
