//! Integration tests per consulenze gratuite e lead per tipologia
//!
//! Test per:
//! - POST /api/frontend/free-consultations (inoltro al CRM)
//! - POST /api/frontend/leads/{kind}
//! - /api/internal/free-consultations e /api/internal/leads/{kind}

mod common;

#[cfg(test)]
mod lead_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::MySqlPool;
    use std::sync::Arc;
    use uniportal::entities::Role;
    use uniportal::external::LocalStorage;

    fn consultation_body() -> Value {
        json!({
            "full_name": "Kofi Mensah",
            "email": "kofi@example.com",
            "phone": "+233 24 555 0101",
            "preferred_country": "Canada",
            "study_level": "master",
            "message": "Looking for a data science program"
        })
    }

    async fn count(pool: &MySqlPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    // ============================================================
    // Consulenze gratuite
    // ============================================================

    #[sqlx::test]
    async fn test_free_consultation_forwarded_to_crm(pool: MySqlPool) -> sqlx::Result<()> {
        let dir = test_dir();
        let crm = ScriptedCrm::accepting();
        let storage = Arc::new(LocalStorage::new(dir.join("uploads"), "http://cdn.test/uploads"));
        let state = create_test_state_with(pool.clone(), storage, crm.clone(), dir).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/free-consultations")
            .json(&consultation_body())
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "new");
        assert_eq!(body["data"]["full_name"], "Kofi Mensah");

        let received = crm.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].source, "free-consultation");
        assert_eq!(received[0].email, "kofi@example.com");
        assert_eq!(received[0].country.as_deref(), Some("Canada"));

        assert_eq!(count(&pool, "free_consulations").await, 1);
        Ok(())
    }

    #[sqlx::test]
    async fn test_free_consultation_rolled_back_when_crm_rejects(pool: MySqlPool) -> sqlx::Result<()> {
        let dir = test_dir();
        let storage = Arc::new(LocalStorage::new(dir.join("uploads"), "http://cdn.test/uploads"));
        let state = create_test_state_with(pool.clone(), storage, ScriptedCrm::rejecting(), dir).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/free-consultations")
            .json(&consultation_body())
            .await;

        response.assert_status_internal_server_error();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to forward lead to CRM");
        assert_eq!(count(&pool, "free_consulations").await, 0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_free_consultation_validation(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/free-consultations")
            .json(&json!({
                "full_name": "K",
                "email": "not-an-email",
                "phone": "abc"
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        let details = &body["details"];
        assert!(details["full_name"].is_array());
        assert!(details["email"].is_array());
        assert!(details["phone"].is_array());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_admin_manages_free_consultations(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let created = server
            .post("/api/frontend/free-consultations")
            .json(&consultation_body())
            .await;
        let id = created.json::<Value>()["data"]["id"].as_i64().unwrap();

        let listed = server
            .get("/api/internal/free-consultations")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        listed.assert_status_ok();
        assert_eq!(listed.json::<Value>()["pagination"]["totalItems"], 1);

        let updated = server
            .patch(&format!("/api/internal/free-consultations/{}/status", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "status": "contacted" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["data"]["status"], "contacted");

        let filtered = server
            .get("/api/internal/free-consultations")
            .add_query_param("status", "new")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        assert_eq!(filtered.json::<Value>()["pagination"]["totalItems"], 0);

        server
            .delete(&format!("/api/internal/free-consultations/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/internal/free-consultations/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_not_found();
        Ok(())
    }

    // ============================================================
    // Lead per tipologia
    // ============================================================

    #[sqlx::test]
    async fn test_unknown_lead_kind(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/leads/scholarship")
            .json(&json!({ "full_name": "Mei Lin", "email": "mei@example.com" }))
            .await;

        response.assert_status_not_found();
        Ok(())
    }

    #[sqlx::test]
    async fn test_visit_visa_lead_requires_its_fields(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .post("/api/frontend/leads/visit-visa")
            .json(&json!({ "full_name": "Mei Lin", "email": "mei@example.com" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["details"]["phone"][0], "phone is required");
        assert_eq!(body["details"]["destination"][0], "destination is required");

        let ok = server
            .post("/api/frontend/leads/visit-visa")
            .json(&json!({
                "full_name": "Mei Lin",
                "email": "mei@example.com",
                "phone": "+86 138 0013 8000",
                "destination": "Australia",
                "travel_date": "2026-12-01"
            }))
            .await;
        ok.assert_status(StatusCode::CREATED);
        let body: Value = ok.json();
        assert_eq!(body["data"]["kind"], "visit-visa");
        assert_eq!(body["data"]["travel_date"], "2026-12-01");
        Ok(())
    }

    #[sqlx::test]
    async fn test_feedback_rating(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/leads/feedback")
            .json(&json!({ "full_name": "Mei Lin", "email": "mei@example.com" }))
            .await
            .assert_status_bad_request();

        server
            .post("/api/frontend/leads/feedback")
            .json(&json!({ "full_name": "Mei Lin", "email": "mei@example.com", "rating": 7 }))
            .await
            .assert_status_bad_request();

        let response = server
            .post("/api/frontend/leads/feedback")
            .json(&json!({ "full_name": "Mei Lin", "email": "mei@example.com", "rating": 5 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["data"]["rating"], 5);
        Ok(())
    }

    #[sqlx::test]
    async fn test_other_leads_are_not_forwarded(pool: MySqlPool) -> sqlx::Result<()> {
        let dir = test_dir();
        let crm = ScriptedCrm::rejecting();
        let storage = Arc::new(LocalStorage::new(dir.join("uploads"), "http://cdn.test/uploads"));
        let state = create_test_state_with(pool, storage, crm.clone(), dir).await;
        let server = create_test_server(state);

        server
            .post("/api/frontend/leads/complaint")
            .json(&json!({
                "full_name": "Mei Lin",
                "email": "mei@example.com",
                "subject": "Late reply",
                "message": "Nobody called me back"
            }))
            .await
            .assert_status(StatusCode::CREATED);
        assert!(crm.received().is_empty());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_admin_leads_are_scoped_by_kind(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let complaint = server
            .post("/api/frontend/leads/complaint")
            .json(&json!({
                "full_name": "Mei Lin",
                "email": "mei@example.com",
                "subject": "Late reply",
                "message": "Nobody called me back"
            }))
            .await;
        let id = complaint.json::<Value>()["data"]["id"].as_i64().unwrap();
        server
            .post("/api/frontend/leads/feedback")
            .json(&json!({ "full_name": "Ola", "email": "ola@example.com", "rating": 4 }))
            .await
            .assert_status(StatusCode::CREATED);

        let complaints = server
            .get("/api/internal/leads/complaint")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        complaints.assert_status_ok();
        assert_eq!(complaints.json::<Value>()["pagination"]["totalItems"], 1);

        // stesso id, tipologia diversa
        server
            .get(&format!("/api/internal/leads/feedback/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_not_found();

        let closed = server
            .patch(&format!("/api/internal/leads/complaint/{}/status", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "status": "closed" }))
            .await;
        closed.assert_status_ok();
        assert_eq!(closed.json::<Value>()["data"]["status"], "closed");

        server
            .delete(&format!("/api/internal/leads/complaint/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_ok();
        server
            .delete(&format!("/api/internal/leads/complaint/{}", id))
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await
            .assert_status_not_found();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_invalid_status_is_rejected(pool: MySqlPool) -> sqlx::Result<()> {
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .patch("/api/internal/leads/complaint/1/status")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "status": "archived" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid request body");

        let consultation = server
            .patch("/api/internal/free-consultations/1/status")
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .json(&json!({ "status": "archived" }))
            .await;
        consultation.assert_status_bad_request();
        assert_eq!(consultation.json::<Value>()["error"], "Invalid request body");
        Ok(())
    }

    // ============================================================
    // Paginazione
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_second_page_is_newest_first(pool: MySqlPool) -> sqlx::Result<()> {
        for day in 1..=7 {
            sqlx::query(
                "INSERT INTO free_consulations (id, full_name, email, phone, status, created_at) \
                 VALUES (?, ?, ?, ?, 'new', ?)",
            )
            .bind(day)
            .bind(format!("Applicant {}", day))
            .bind(format!("applicant{}@example.com", day))
            .bind("+44 20 7946 0000")
            .bind(format!("2026-01-0{} 09:00:00", day))
            .execute(&pool)
            .await?;
        }
        let state = create_test_state(pool).await;
        let server = create_test_server(state);

        let response = server
            .get("/api/internal/free-consultations")
            .add_query_param("page", 2)
            .add_query_param("limit", 3)
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4, 3, 2]);

        let pagination = &body["pagination"];
        assert_eq!(pagination["currentPage"], 2);
        assert_eq!(pagination["totalPages"], 3);
        assert_eq!(pagination["totalItems"], 7);
        assert_eq!(pagination["limit"], 3);
        assert_eq!(pagination["hasNextPage"], true);
        assert_eq!(pagination["hasPrevPage"], true);

        let last = server
            .get("/api/internal/free-consultations")
            .add_query_param("page", 3)
            .add_query_param("limit", 3)
            .add_header(authorization(), bearer(ADMIN_ID, Role::Admin))
            .await;
        let body: Value = last.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], 1);
        assert_eq!(body["pagination"]["hasNextPage"], false);
        Ok(())
    }
}
