//! University entity - Entità università (tabella `university_details`)

use super::enums::UniversityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct University {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub country_id: Option<i32>,
    // da LEFT JOIN su countries
    pub country_name: Option<String>,
    pub city: Option<String>,
    #[sqlx(try_from = "String")]
    pub university_type: UniversityType,
    pub ranking: Option<i32>,
    pub established_year: Option<i32>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
