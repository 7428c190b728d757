//! Lead entities - Richieste di contatto dei potenziali studenti

use super::enums::{LeadKind, LeadStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Richiesta di consulenza gratuita (tabella `free_consulations`)
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct FreeConsultation {
    pub id: i32,
    pub user_id: Option<i32>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub preferred_country: Option<String>,
    pub study_level: Option<String>,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

/// Gli altri lead (visti, offerte, consulenze online, reclami, feedback)
/// condividono la tabella `leads`; le colonne specifiche sono nullable
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Lead {
    pub id: i32,
    #[sqlx(try_from = "String")]
    pub kind: LeadKind,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub destination: Option<String>,
    pub travel_date: Option<NaiveDate>,
    pub offer_code: Option<String>,
    pub preferred_time: Option<String>,
    pub rating: Option<i32>,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}
