//! Integration tests per offerte di lavoro e pagine visti
//!
//! Test per:
//! - /api/frontend/jobs e /jobs/{id}/apply
//! - /api/internal/jobs e /jobs/{id}/applications
//! - /api/frontend/visas e CRUD /api/internal/visa-*

mod common;

#[cfg(test)]
mod job_visa_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::MySqlPool;
    use uniportal::entities::Role;

    fn application() -> Value {
        json!({
            "full_name": "Chidi Okafor",
            "email": "chidi@example.com",
            "phone": "+234 803 555 0199",
            "cover_letter": "I have advised over 200 students."
        })
    }

    // ============================================================
    // Offerte di lavoro
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("jobs")))]
    async fn test_public_jobs_are_active_only(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server.get("/api/frontend/jobs").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["pagination"]["totalItems"], 2);

        server.get("/api/frontend/jobs/2").await.assert_status_not_found();
        server.get("/api/frontend/jobs/1").await.assert_status_ok();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("jobs")))]
    async fn test_non_numeric_job_id_is_a_json_bad_request(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server.get("/api/frontend/jobs/abc").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid path parameter");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("jobs")))]
    async fn test_apply_to_active_job(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/jobs/1/apply")
            .json(&application())
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["job_id"], 1);
        assert_eq!(body["data"]["full_name"], "Chidi Okafor");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("jobs")))]
    async fn test_apply_to_inactive_job(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/jobs/2/apply")
            .json(&application())
            .await
            .assert_status_not_found();
        server
            .post("/api/frontend/jobs/99/apply")
            .json(&application())
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "jobs")))]
    async fn test_admin_sees_applications(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/jobs/3/apply")
            .json(&application())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/internal/jobs/3/applications")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["pagination"]["totalItems"], 1);
        assert_eq!(body["data"][0]["email"], "chidi@example.com");

        server
            .get("/api/internal/jobs/99/applications")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "jobs")))]
    async fn test_admin_job_lifecycle(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let all = server
            .get("/api/internal/jobs")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        assert_eq!(all.json::<Value>()["pagination"]["totalItems"], 3);

        let reopened = server
            .put("/api/internal/jobs/2")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "is_active": true }))
            .await;
        reopened.assert_status_ok();
        assert_eq!(reopened.json::<Value>()["data"]["is_active"], true);
        server.get("/api/frontend/jobs/2").await.assert_status_ok();

        let created = server
            .post("/api/internal/jobs")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({
                "title": "Admissions Officer",
                "company": "UniPortal",
                "description": "Review applications",
                "deadline": "2031-01-15"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["data"]["deadline"], "2031-01-15");
        assert_eq!(body["data"]["is_active"], true);
        Ok(())
    }

    // ============================================================
    // Visti
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("visas")))]
    async fn test_visa_country_page(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server.get("/api/frontend/visas/canada").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "Canada");
        let types = body["data"]["visa_types"].as_array().unwrap();
        assert_eq!(types.len(), 2);

        let study = types.iter().find(|t| t["name"] == "Study Permit").unwrap();
        assert_eq!(study["requirements"].as_array().unwrap().len(), 3);
        let visitor = types.iter().find(|t| t["name"] == "Visitor Visa").unwrap();
        assert_eq!(visitor["requirements"][0]["is_mandatory"], false);

        let empty = server.get("/api/frontend/visas/united-kingdom").await;
        assert!(empty.json::<Value>()["data"]["visa_types"].as_array().unwrap().is_empty());

        server.get("/api/frontend/visas/narnia").await.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("visas")))]
    async fn test_visa_country_list(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server.get("/api/frontend/visas").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["pagination"]["totalItems"], 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "visas")))]
    async fn test_create_visa_type_for_missing_country(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/internal/visa-types")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "visa_country_id": 42, "name": "Work Permit" }))
            .await
            .assert_status_bad_request();

        let created = server
            .post("/api/internal/visa-types")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "visa_country_id": 2, "name": "Student Visa", "fee": 490.0 }))
            .await;
        created.assert_status(StatusCode::CREATED);
        assert_eq!(created.json::<Value>()["data"]["visa_country_id"], 2);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "visas")))]
    async fn test_visa_requirement_crud(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/internal/visa-requirements")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "visa_type_id": 77, "title": "Biometrics" }))
            .await
            .assert_status_bad_request();

        let created = server
            .post("/api/internal/visa-requirements")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "visa_type_id": 2, "title": "Biometrics" }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["data"]["id"].as_i64().unwrap();

        let listed = server
            .get("/api/internal/visa-requirements")
            .add_query_param("visa_type_id", 2)
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        assert_eq!(listed.json::<Value>()["pagination"]["totalItems"], 2);

        server
            .delete(&format!("/api/internal/visa-requirements/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_ok();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "visas")))]
    async fn test_delete_visa_country_cascades(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool.clone()).await;
        let server = create_test_server(state);

        server
            .delete("/api/internal/visa-countries/1")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_ok();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visa_requirements")
            .fetch_one(&pool)
            .await?;
        assert_eq!(remaining, 0);
        Ok(())
    }
}
