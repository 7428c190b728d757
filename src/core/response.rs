//! Envelope JSON di successo `{ success, data, pagination?, message? }`

use crate::core::pagination::{Page, Pagination};
use axum::{Json, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            pagination: None,
            message: None,
        })
    }

    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Self::ok(data))
    }

    pub fn with_message(data: T, message: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            pagination: None,
            message: Some(message),
        })
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn paginated(page: Page<T>) -> Json<Self> {
        Json(Self {
            success: true,
            data: page.items,
            pagination: Some(page.pagination),
            message: None,
        })
    }
}

/// Risposta per le operazioni che non restituiscono dati (es. DELETE)
pub fn message(message: &'static str) -> Json<ApiResponse<Option<()>>> {
    ApiResponse::with_message(None, message)
}

/// Alias per gli handler che rispondono con l'envelope standard
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, crate::core::AppError>;

/// Alias per gli handler che creano risorse (201)
pub type ApiCreated<T> = Result<(StatusCode, Json<ApiResponse<T>>), crate::core::AppError>;
