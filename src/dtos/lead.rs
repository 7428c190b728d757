//! Lead DTOs - Consulenze gratuite e altri lead del sito pubblico

use crate::core::PageParams;
use crate::core::slug::PHONE_RE;
use crate::entities::{LeadKind, LeadStatus};
use crate::external::CrmLead;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct CreateFreeConsultationDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub full_name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: String,
    #[validate(length(max = 120))]
    pub preferred_country: Option<String>,
    #[validate(length(max = 60))]
    pub study_level: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

impl CreateFreeConsultationDTO {
    pub fn to_crm_lead(&self) -> CrmLead {
        CrmLead {
            source: "free-consultation",
            name: self.full_name.clone(),
            email: self.email.clone(),
            phone: Some(self.phone.clone()),
            country: self.preferred_country.clone(),
            message: self.message.clone(),
        }
    }
}

/// Lead generico; i campi richiesti dipendono dal tipo, vedi `missing_fields`
#[derive(Deserialize, Debug, Default, Validate)]
pub struct CreateLeadDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub full_name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number is not valid"))]
    pub phone: Option<String>,
    #[validate(length(min = 2, max = 190))]
    pub subject: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    #[validate(length(min = 2, max = 120))]
    pub destination: Option<String>,
    pub travel_date: Option<NaiveDate>,
    #[validate(length(min = 2, max = 60))]
    pub offer_code: Option<String>,
    #[validate(length(min = 2, max = 60))]
    pub preferred_time: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

impl CreateLeadDTO {
    /// Campi obbligatori per il tipo di lead che risultano assenti
    pub fn missing_fields(&self, kind: LeadKind) -> Vec<&'static str> {
        let required: &[(&'static str, bool)] = match kind {
            LeadKind::VisitVisa => &[
                ("phone", self.phone.is_some()),
                ("destination", self.destination.is_some()),
            ],
            LeadKind::DiscountOffer => &[
                ("phone", self.phone.is_some()),
                ("offer_code", self.offer_code.is_some()),
            ],
            LeadKind::OnlineConsultant => &[
                ("phone", self.phone.is_some()),
                ("preferred_time", self.preferred_time.is_some()),
            ],
            LeadKind::Complaint => &[
                ("subject", self.subject.is_some()),
                ("message", self.message.is_some()),
            ],
            LeadKind::Feedback => &[("rating", self.rating.is_some())],
        };
        required
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect()
    }
}

#[derive(Deserialize, Debug, Validate)]
pub struct UpdateLeadStatusDTO {
    pub status: LeadStatus,
}

#[derive(Deserialize, Debug, Default)]
pub struct LeadListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn base() -> CreateLeadDTO {
        CreateLeadDTO {
            full_name: "Mei Lin".to_string(),
            email: "mei@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_visit_visa_requires_destination_and_phone() {
        let lead = base();
        assert_eq!(
            lead.missing_fields(LeadKind::VisitVisa),
            vec!["phone", "destination"]
        );
    }

    #[test]
    fn test_feedback_requires_only_rating() {
        let mut lead = base();
        assert_eq!(lead.missing_fields(LeadKind::Feedback), vec!["rating"]);
        lead.rating = Some(4);
        assert!(lead.missing_fields(LeadKind::Feedback).is_empty());
    }

    #[test]
    fn test_rating_out_of_range_fails_validation() {
        let mut lead = base();
        lead.rating = Some(9);
        assert!(lead.validate().is_err());
    }
}
