//! User entity - Entità utente con metodi per gestione password

use super::enums::Role;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }
}

/// Dati aggiuntivi degli studenti (tabella `student_profiles`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, sqlx::FromRow)]
pub struct StudentProfile {
    pub user_id: i32,
    pub interested_country: Option<String>,
    pub interested_course: Option<String>,
    pub study_level: Option<String>,
    pub city: Option<String>,
}

/// Dati aggiuntivi dei consulenti (tabella `consultant_profiles`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, sqlx::FromRow)]
pub struct ConsultantProfile {
    pub user_id: i32,
    pub company_name: String,
    pub license_number: Option<String>,
    pub city: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
}

/// Riga della directory consulenti: utente + profilo
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Consultant {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_name: String,
    pub license_number: Option<String>,
    pub city: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}
