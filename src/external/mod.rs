//! External Module - Collaboratori esterni dietro trait
//!
//! - `storage`: object storage per immagini, CV e PDF (S3 o filesystem locale)
//! - `crm`: inoltro dei lead al CRM
//! - `ledger`: registro JSON delle immagini caricate

pub mod crm;
pub mod ledger;
pub mod storage;

pub use crm::{CrmClient, CrmError, CrmLead, HttpCrmClient, NoopCrmClient};
pub use ledger::{ImageLedger, ImageRecord, LedgerError};
pub use storage::{LocalStorage, ObjectStorage, S3Storage, StorageError, StoredObject, object_key};
