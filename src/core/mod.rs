//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione, JWT e cookie
//! - Configurazione
//! - Gestione errori ed envelope delle risposte
//! - Paginazione e costruzione dinamica delle query
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod query;
pub mod response;
pub mod slug;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Claims, admin_middleware, authentication_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use error::AppError;
pub use extract::{Path, Query, ValidatedJson};
pub use pagination::{Page, PageParams, Pagination};
pub use query::{ListQuery, SqlFilter, UpdateBuilder};
pub use response::{ApiCreated, ApiResponse, ApiResult};
pub use state::{AppState, AuthSettings};
