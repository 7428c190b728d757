//! University DTOs - Data Transfer Objects per università

use crate::core::PageParams;
use crate::core::slug::SLUG_RE;
use crate::entities::{Course, University, UniversityType};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateUniversityDTO {
    #[validate(length(min = 2, max = 190, message = "Name must be between 2 and 190 characters"))]
    pub name: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub country_id: Option<i32>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    #[serde(default = "default_university_type")]
    pub university_type: UniversityType,
    #[validate(range(min = 1, max = 100000))]
    pub ranking: Option<i32>,
    #[validate(range(min = 1000, max = 2100))]
    pub established_year: Option<i32>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(length(max = 255))]
    pub logo: Option<String>,
    pub description: Option<String>,
}

fn default_university_type() -> UniversityType {
    UniversityType::Public
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateUniversityDTO {
    #[validate(length(min = 2, max = 190, message = "Name must be between 2 and 190 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub country_id: Option<i32>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    pub university_type: Option<UniversityType>,
    #[validate(range(min = 1, max = 100000))]
    pub ranking: Option<i32>,
    #[validate(range(min = 1000, max = 2100))]
    pub established_year: Option<i32>,
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(length(max = 255))]
    pub logo: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UniversityListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub country_id: Option<i32>,
    pub city: Option<String>,
    pub university_type: Option<UniversityType>,
}

impl UniversityListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// Pagina di dettaglio: università con i suoi corsi
#[derive(Serialize, Debug)]
pub struct UniversityDetailDTO {
    #[serde(flatten)]
    pub university: University,
    pub courses: Vec<Course>,
}
