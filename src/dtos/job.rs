//! Job DTOs - Data Transfer Objects per offerte di lavoro e candidature

use crate::core::PageParams;
use crate::core::slug::PHONE_RE;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateJobDTO {
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: String,
    #[validate(length(min = 2, max = 190, message = "Company must be between 2 and 190 characters"))]
    pub company: String,
    #[validate(length(max = 190))]
    pub location: Option<String>,
    #[validate(length(max = 40))]
    pub job_type: Option<String>,
    #[validate(length(max = 80))]
    pub salary_range: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateJobDTO {
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 2, max = 190, message = "Company must be between 2 and 190 characters"))]
    pub company: Option<String>,
    #[validate(length(max = 190))]
    pub location: Option<String>,
    #[validate(length(max = 40))]
    pub job_type: Option<String>,
    #[validate(length(max = 80))]
    pub salary_range: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct JobListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// solo lista interna: filtra per stato
    pub is_active: Option<bool>,
}

impl JobListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

#[derive(Deserialize, Debug, Validate)]
pub struct ApplyJobDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub full_name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub resume_key: Option<String>,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
}
