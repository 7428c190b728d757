//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella, eventualmente arricchita da colonne in JOIN.

pub mod blog;
pub mod country;
pub mod course;
pub mod enums;
pub mod geo;
pub mod job;
pub mod lead;
pub mod notification;
pub mod resume;
pub mod subject;
pub mod university;
pub mod user;
pub mod visa;
pub mod wishlist;

// Re-exports per facilitare l'import
pub use blog::{Blog, BlogCategory, Comment, Reply};
pub use country::Country;
pub use course::Course;
pub use enums::{CourseLevel, LeadKind, LeadStatus, Role, UniversityType, UnknownVariant};
pub use geo::{GeoCity, GeoCountry, GeoState};
pub use job::{Job, JobApplication};
pub use lead::{FreeConsultation, Lead};
pub use notification::Notification;
pub use resume::Resume;
pub use subject::Subject;
pub use university::University;
pub use user::{Consultant, ConsultantProfile, StudentProfile, User};
pub use visa::{VisaCountry, VisaRequirement, VisaType};
pub use wishlist::WishlistItem;
