//! Job entities - Offerte di lavoro (`job_opprtunities`) e candidature (`job_applies`)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct JobApplication {
    pub id: i32,
    pub job_id: i32,
    pub user_id: Option<i32>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_key: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
}
