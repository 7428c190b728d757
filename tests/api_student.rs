//! Integration tests per l'area studente
//!
//! Test per:
//! - /api/frontend/wishlist
//! - /api/frontend/notifications e /api/internal/notifications
//! - /api/frontend/consultants

mod common;

#[cfg(test)]
mod student_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::MySqlPool;
    use uniportal::entities::Role;

    // ============================================================
    // Wishlist
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "catalog")))]
    async fn test_wishlist_add_is_idempotent(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let first = server
            .post("/api/frontend/wishlist")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .json(&json!({ "course_id": 1 }))
            .await;
        first.assert_status(StatusCode::CREATED);
        let first_id = first.json::<Value>()["data"]["id"].clone();

        let second = server
            .post("/api/frontend/wishlist")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .json(&json!({ "course_id": 1 }))
            .await;
        second.assert_status_ok();
        assert_eq!(second.json::<Value>()["data"]["id"], first_id);

        let list = server
            .get("/api/frontend/wishlist")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await;
        list.assert_status_ok();
        let body: Value = list.json();
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["course_slug"], "msc-computer-science-toronto");
        assert_eq!(items[0]["university_name"], "University of Toronto");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "catalog")))]
    async fn test_wishlist_is_per_student(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/wishlist")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .json(&json!({ "course_id": 4 }))
            .await
            .assert_status(StatusCode::CREATED);

        let other = server
            .get("/api/frontend/wishlist")
            .add_header(authorization(), bearer(OTHER_STUDENT_ID, Role::Student))
            .await;
        assert!(other.json::<Value>()["data"].as_array().unwrap().is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "catalog")))]
    async fn test_wishlist_only_for_students(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/wishlist")
            .add_header(authorization(), bearer(CONSULTANT_ID, Role::Consultant))
            .json(&json!({ "course_id": 1 }))
            .await;
        response.assert_status_unauthorized();

        server
            .get("/api/frontend/wishlist")
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "catalog")))]
    async fn test_wishlist_missing_course(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/wishlist")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .json(&json!({ "course_id": 999 }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "catalog")))]
    async fn test_wishlist_remove(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/wishlist")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .json(&json!({ "course_id": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete("/api/frontend/wishlist/2")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await
            .assert_status_ok();
        server
            .delete("/api/frontend/wishlist/2")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await
            .assert_status_not_found();
        Ok(())
    }

    // ============================================================
    // Notifiche
    // ============================================================

    async fn notify(server: &axum_test::TestServer, user_id: Option<i32>, title: &str) -> i64 {
        let response = server
            .post("/api/internal/notifications")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({
                "user_id": user_id,
                "title": title,
                "message": "Check your dashboard"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"]["id"].as_i64().unwrap()
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_personal_and_broadcast_notifications(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        notify(&server, Some(STUDENT_ID), "Offer letter received").await;
        notify(&server, None, "Intake deadlines").await;
        notify(&server, Some(OTHER_STUDENT_ID), "Document missing").await;

        let response = server
            .get("/api/frontend/notifications")
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["pagination"]["totalItems"], 2);
        let titles: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"Offer letter received"));
        assert!(titles.contains(&"Intake deadlines"));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_mark_notification_read(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let mine = notify(&server, Some(STUDENT_ID), "Offer letter received").await;
        let theirs = notify(&server, Some(OTHER_STUDENT_ID), "Document missing").await;

        let read = server
            .patch(&format!("/api/frontend/notifications/{}/read", mine))
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await;
        read.assert_status_ok();
        assert_eq!(read.json::<Value>()["data"]["is_read"], true);

        let unread = server
            .get("/api/frontend/notifications")
            .add_query_param("unread_only", true)
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await;
        assert_eq!(unread.json::<Value>()["pagination"]["totalItems"], 0);

        server
            .patch(&format!("/api/frontend/notifications/{}/read", theirs))
            .add_header(authorization(), bearer(STUDENT_ID, Role::Student))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_admin_notification_for_missing_user(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/internal/notifications")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({
                "user_id": 999,
                "title": "Hello",
                "message": "Nobody home"
            }))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_admin_deletes_notification(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let id = notify(&server, None, "Intake deadlines").await;

        server
            .delete(&format!("/api/internal/notifications/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_ok();

        let listed = server
            .get("/api/internal/notifications")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        assert_eq!(listed.json::<Value>()["pagination"]["totalItems"], 0);
        Ok(())
    }

    // ============================================================
    // Consulenti
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_consultant_directory(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let all = server.get("/api/frontend/consultants").await;
        all.assert_status_ok();
        assert_eq!(all.json::<Value>()["pagination"]["totalItems"], 2);

        let lagos = server
            .get("/api/frontend/consultants")
            .add_query_param("city", "Lagos")
            .await;
        let body: Value = lagos.json();
        assert_eq!(body["pagination"]["totalItems"], 1);
        assert_eq!(body["data"][0]["company_name"], "Bright Path Advisors");
        assert!(body["data"][0].get("password").is_none());
        Ok(())
    }
}
