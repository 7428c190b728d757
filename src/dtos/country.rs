//! Country DTOs - Destinazioni di studio

use crate::core::slug::SLUG_RE;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateCountryDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub image: Option<String>,
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateCountryDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub image: Option<String>,
}
