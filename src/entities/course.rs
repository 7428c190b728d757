//! Course entity - Entità corso, sempre letta in join con università e materia

use super::enums::CourseLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Course {
    pub id: i32,
    pub university_id: i32,
    pub university_name: String,
    pub university_slug: String,
    pub country_name: Option<String>,
    pub subject_id: Option<i32>,
    pub subject_name: Option<String>,
    pub title: String,
    pub slug: String,
    #[sqlx(try_from = "String")]
    pub level: CourseLevel,
    pub duration_months: Option<i32>,
    pub tuition_fee: Option<f64>,
    pub currency: Option<String>,
    pub intake: Option<String>,
    pub qualification: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
