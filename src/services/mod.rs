//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica area del portale;
//! le route pubbliche e quelle interne (admin) condividono gli stessi handler dove possibile.

pub mod auth;
pub mod blog;
pub mod catalog;
pub mod discovery;
pub mod job;
pub mod lead;
pub mod student;
pub mod upload;
pub mod visa;

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
