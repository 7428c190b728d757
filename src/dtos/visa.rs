//! Visa DTOs - Paesi, tipologie e requisiti dei visti

use crate::core::PageParams;
use crate::core::slug::SLUG_RE;
use crate::entities::{VisaCountry, VisaRequirement, VisaType};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateVisaCountryDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    #[validate(length(max = 255))]
    pub flag_image: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateVisaCountryDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    #[validate(length(max = 255))]
    pub flag_image: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CreateVisaTypeDTO {
    #[validate(range(min = 1, message = "Visa country is required"))]
    pub visa_country_id: i32,
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(length(max = 80))]
    pub processing_time: Option<String>,
    #[validate(range(min = 0.0, message = "Fee cannot be negative"))]
    pub fee: Option<f64>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateVisaTypeDTO {
    #[validate(range(min = 1))]
    pub visa_country_id: Option<i32>,
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 80))]
    pub processing_time: Option<String>,
    #[validate(range(min = 0.0, message = "Fee cannot be negative"))]
    pub fee: Option<f64>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CreateVisaRequirementDTO {
    #[validate(range(min = 1, message = "Visa type is required"))]
    pub visa_type_id: i32,
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_mandatory")]
    pub is_mandatory: bool,
}

fn default_mandatory() -> bool {
    true
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateVisaRequirementDTO {
    #[validate(range(min = 1))]
    pub visa_type_id: Option<i32>,
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_mandatory: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct VisaTypeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub visa_country_id: Option<i32>,
}

impl VisaTypeListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct VisaRequirementListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub visa_type_id: Option<i32>,
}

impl VisaRequirementListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

#[derive(Serialize, Debug)]
pub struct VisaTypeDetailDTO {
    #[serde(flatten)]
    pub visa_type: VisaType,
    pub requirements: Vec<VisaRequirement>,
}

/// Pagina pubblica di un paese: tipologie di visto con i rispettivi requisiti
#[derive(Serialize, Debug)]
pub struct VisaCountryDetailDTO {
    #[serde(flatten)]
    pub country: VisaCountry,
    pub visa_types: Vec<VisaTypeDetailDTO>,
}
