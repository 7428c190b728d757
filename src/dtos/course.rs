//! Course DTOs - Data Transfer Objects per corsi e materie

use crate::core::PageParams;
use crate::core::slug::SLUG_RE;
use crate::entities::CourseLevel;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateCourseDTO {
    #[validate(range(min = 1, message = "University is required"))]
    pub university_id: i32,
    pub subject_id: Option<i32>,
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub level: CourseLevel,
    #[validate(range(min = 1, max = 120, message = "Duration must be between 1 and 120 months"))]
    pub duration_months: Option<i32>,
    #[validate(range(min = 0.0, message = "Tuition fee cannot be negative"))]
    pub tuition_fee: Option<f64>,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: Option<String>,
    #[validate(length(max = 120))]
    pub intake: Option<String>,
    pub qualification: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateCourseDTO {
    #[validate(range(min = 1))]
    pub university_id: Option<i32>,
    pub subject_id: Option<i32>,
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: Option<String>,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub level: Option<CourseLevel>,
    #[validate(range(min = 1, max = 120, message = "Duration must be between 1 and 120 months"))]
    pub duration_months: Option<i32>,
    #[validate(range(min = 0.0, message = "Tuition fee cannot be negative"))]
    pub tuition_fee: Option<f64>,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: Option<String>,
    #[validate(length(max = 120))]
    pub intake: Option<String>,
    pub qualification: Option<String>,
    pub description: Option<String>,
}

/// Ordinamenti ammessi per la lista corsi
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourseSort {
    #[default]
    Newest,
    FeeAsc,
    FeeDesc,
    Title,
}

impl CourseSort {
    pub fn order_by(self) -> &'static str {
        match self {
            CourseSort::Newest => "c.created_at DESC, c.id DESC",
            CourseSort::FeeAsc => "c.tuition_fee IS NULL, c.tuition_fee ASC, c.id DESC",
            CourseSort::FeeDesc => "c.tuition_fee DESC, c.id DESC",
            CourseSort::Title => "c.title ASC, c.id ASC",
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct CourseListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub university_id: Option<i32>,
    pub subject_id: Option<i32>,
    pub level: Option<CourseLevel>,
    pub country_id: Option<i32>,
    pub min_fee: Option<f64>,
    pub max_fee: Option<f64>,
    #[serde(default)]
    pub sort: CourseSort,
}

impl CourseListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// Usato sia per creare che per aggiornare (nome obbligatorio in entrambi i casi)
#[derive(Deserialize, Debug, Validate)]
pub struct SubjectDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
}
