//! User DTOs - Data Transfer Objects per utenti, registrazione e profilo

use crate::core::slug::PHONE_RE;
use crate::core::PageParams;
use crate::entities::{ConsultantProfile, Role, StudentProfile, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// struct per gestire io col client, la password non esce mai
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDTO {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            role: value.role,
            created_at: value.created_at,
        }
    }
}

/// Utente corrente con il profilo del suo ruolo
#[derive(Serialize, Debug)]
pub struct ProfileDTO {
    pub user: UserDTO,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultant_profile: Option<ConsultantProfile>,
}

/// Riga da inserire in `users` (password già hashata)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Deserialize, Debug, Validate)]
pub struct RegisterStudentDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: String,
    #[validate(length(max = 120))]
    pub interested_country: Option<String>,
    #[validate(length(max = 190))]
    pub interested_course: Option<String>,
    #[validate(length(max = 60))]
    pub study_level: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
pub struct RegisterConsultantDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: String,
    #[validate(length(min = 2, max = 190, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(max = 80))]
    pub license_number: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience_years: Option<i32>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

/// DTO per il login
#[derive(Deserialize, Debug, Validate)]
pub struct LoginDTO {
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Aggiornamento del profilo: i campi del ruolo sbagliato vengono ignorati
#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateProfileDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    // studente
    #[validate(length(max = 120))]
    pub interested_country: Option<String>,
    #[validate(length(max = 190))]
    pub interested_course: Option<String>,
    #[validate(length(max = 60))]
    pub study_level: Option<String>,
    // consulente
    #[validate(length(min = 2, max = 190))]
    pub company_name: Option<String>,
    #[validate(length(max = 80))]
    pub license_number: Option<String>,
    #[validate(range(min = 0, max = 80))]
    pub experience_years: Option<i32>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CreateAdminDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ConsultantListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub city: Option<String>,
}

impl ConsultantListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// Risposta del login: il token viaggia anche nel cookie
#[derive(Serialize, Debug)]
pub struct LoginResponseDTO {
    pub user: UserDTO,
    pub token: String,
}
