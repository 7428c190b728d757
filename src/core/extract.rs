//! Extractor con rejection nell'envelope JSON dell'API
//!
//! Body, query string e parametri di percorso malformati diventano tutti
//! `400 {success:false, error, details}` invece del testo semplice di axum.

use crate::core::AppError;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

/// Body JSON deserializzato e validato: body malformato o campi non validi -> 400
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            warn!("Rejected request body: {}", rejection.body_text());
            AppError::bad_request("Invalid request body").with_details(rejection.body_text())
        })?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string deserializzata; parametri non convertibili -> 400
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!("Rejected query string: {}", rejection.body_text());
                AppError::bad_request("Invalid query parameters").with_details(rejection.body_text())
            })?;
        Ok(Self(value))
    }
}

/// Parametri di percorso; `/jobs/abc` su una rotta `{id}` numerica -> 400
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!("Rejected path parameter: {}", rejection.body_text());
                AppError::bad_request("Invalid path parameter").with_details(rejection.body_text())
            })?;
        Ok(Self(value))
    }
}
