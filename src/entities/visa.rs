//! Visa entities - Paesi, tipologie di visto e requisiti

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct VisaCountry {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub flag_image: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct VisaType {
    pub id: i32,
    pub visa_country_id: i32,
    pub name: String,
    pub processing_time: Option<String>,
    pub fee: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct VisaRequirement {
    pub id: i32,
    pub visa_type_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_mandatory: bool,
    pub created_at: DateTime<Utc>,
}
