//! Lead services - Consulenze gratuite (con inoltro al CRM) e lead per tipologia

use crate::core::response::message;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Path, Query, ValidatedJson};
use crate::dtos::{CreateFreeConsultationDTO, CreateLeadDTO, LeadListQuery, UpdateLeadStatusDTO};
use crate::entities::{FreeConsultation, Lead, LeadKind};
use crate::repositories::{Delete, Read};
use axum::extract::State;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Tipologia dal path; un tipo sconosciuto è una risorsa inesistente
fn parse_kind(kind: &str) -> Result<LeadKind, AppError> {
    kind.parse::<LeadKind>().map_err(|_| {
        warn!(kind, "Unknown lead type");
        AppError::not_found("Unknown lead type")
    })
}

// ************************* CONSULENZE GRATUITE ************************* //

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn submit_free_consultation(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateFreeConsultationDTO>,
) -> ApiCreated<FreeConsultation> {
    // 1. INSERT in transazione
    // 2. Inoltro al CRM
    // 3. Commit solo se il CRM accetta, altrimenti rollback: nessun record locale orfano
    let mut tx = state.pool.begin().await?;
    let consultation = state
        .free_consultation
        .insert_tx(&mut *tx, None, &body)
        .await?;

    if let Err(e) = state.crm.forward(&body.to_crm_lead()).await {
        error!("CRM rejected free consultation, rolling back: {}", e);
        tx.rollback().await?;
        return Err(e.into());
    }

    tx.commit().await?;
    info!(consultation_id = consultation.id, "Free consultation stored");
    Ok(ApiResponse::created(consultation))
}

#[instrument(skip(state))]
pub async fn list_free_consultations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeadListQuery>,
) -> ApiResult<Vec<FreeConsultation>> {
    Ok(ApiResponse::paginated(state.free_consultation.list(&query).await?))
}

#[instrument(skip(state))]
pub async fn get_free_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<FreeConsultation> {
    let consultation = state
        .free_consultation
        .read(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Free consultation not found"))?;
    Ok(ApiResponse::ok(consultation))
}

#[instrument(skip(state))]
pub async fn update_free_consultation_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateLeadStatusDTO>,
) -> ApiResult<FreeConsultation> {
    let consultation = state
        .free_consultation
        .update_status(id, body.status)
        .await?
        .ok_or_else(|| AppError::not_found("Free consultation not found"))?;
    Ok(ApiResponse::ok(consultation))
}

#[instrument(skip(state))]
pub async fn delete_free_consultation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.free_consultation.delete(&id).await? {
        return Err(AppError::not_found("Free consultation not found"));
    }
    Ok(message("Free consultation deleted"))
}

// ************************* LEAD PER TIPOLOGIA ************************* //

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    ValidatedJson(body): ValidatedJson<CreateLeadDTO>,
) -> ApiCreated<Lead> {
    // 1. Tipologia valida
    // 2. Campi obbligatori per la tipologia, riportati come errori di campo
    let kind = parse_kind(&kind)?;
    let missing = body.missing_fields(kind);
    if !missing.is_empty() {
        let fields: Map<String, Value> = missing
            .into_iter()
            .map(|field| {
                (
                    field.to_string(),
                    Value::Array(vec![Value::String(format!("{} is required", field))]),
                )
            })
            .collect();
        return Err(AppError::bad_request("Validation error").with_fields(Value::Object(fields)));
    }

    let lead = state.lead.create(kind, &body).await?;
    info!(lead_id = lead.id, %kind, "Lead stored");
    Ok(ApiResponse::created(lead))
}

#[instrument(skip(state))]
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(query): Query<LeadListQuery>,
) -> ApiResult<Vec<Lead>> {
    let kind = parse_kind(&kind)?;
    Ok(ApiResponse::paginated(state.lead.list(kind, &query).await?))
}

#[instrument(skip(state))]
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i32)>,
) -> ApiResult<Lead> {
    let kind = parse_kind(&kind)?;
    let lead = state
        .lead
        .find(kind, id)
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found"))?;
    Ok(ApiResponse::ok(lead))
}

#[instrument(skip(state))]
pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i32)>,
    ValidatedJson(body): ValidatedJson<UpdateLeadStatusDTO>,
) -> ApiResult<Lead> {
    let kind = parse_kind(&kind)?;
    let lead = state
        .lead
        .update_status(kind, id, body.status)
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found"))?;
    Ok(ApiResponse::ok(lead))
}

#[instrument(skip(state))]
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, i32)>,
) -> ApiResult<Option<()>> {
    let kind = parse_kind(&kind)?;
    if !state.lead.delete(kind, id).await? {
        return Err(AppError::not_found("Lead not found"));
    }
    Ok(message("Lead deleted"))
}
