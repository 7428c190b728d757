//! Visa services - Paesi, tipologie di visto, requisiti e pagina pubblica per paese

use crate::core::response::message;
use crate::core::slug::slug_or_from;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Path, Query, ValidatedJson};
use crate::dtos::{
    CreateVisaCountryDTO, CreateVisaRequirementDTO, CreateVisaTypeDTO, PageQuery,
    UpdateVisaCountryDTO, UpdateVisaRequirementDTO, UpdateVisaTypeDTO, VisaCountryDetailDTO,
    VisaRequirementListQuery, VisaTypeDetailDTO, VisaTypeListQuery,
};
use crate::entities::{VisaCountry, VisaRequirement, VisaType};
use crate::repositories::{Create, Delete, Read, Update};
use axum::extract::State;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

// ************************* PAGINE PUBBLICHE ************************* //

#[instrument(skip(state))]
pub async fn list_visa_countries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<VisaCountry>> {
    let page = state
        .visa_country
        .list(query.search.as_deref(), query.page_params())
        .await?;
    Ok(ApiResponse::paginated(page))
}

/// Paese -> tipologie -> requisiti di ciascuna tipologia
#[instrument(skip(state))]
pub async fn get_visa_country_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<VisaCountryDetailDTO> {
    let country = state
        .visa_country
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Visa country not found"))?;

    let types = state.visa_type.list_by_country(country.id).await?;
    let type_ids: Vec<i32> = types.iter().map(|t| t.id).collect();
    let requirements = state.visa_requirement.list_by_types(&type_ids).await?;
    debug!(types = types.len(), requirements = requirements.len(), "Visa detail loaded");

    let mut by_type: HashMap<i32, Vec<VisaRequirement>> = HashMap::new();
    for requirement in requirements {
        by_type.entry(requirement.visa_type_id).or_default().push(requirement);
    }
    let visa_types = types
        .into_iter()
        .map(|visa_type| VisaTypeDetailDTO {
            requirements: by_type.remove(&visa_type.id).unwrap_or_default(),
            visa_type,
        })
        .collect();

    Ok(ApiResponse::ok(VisaCountryDetailDTO { country, visa_types }))
}

// ************************* PAESI ************************* //

#[instrument(skip(state))]
pub async fn get_visa_country(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<VisaCountry> {
    let country = state
        .visa_country
        .read(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Visa country not found"))?;
    Ok(ApiResponse::ok(country))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_visa_country(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateVisaCountryDTO>,
) -> ApiCreated<VisaCountry> {
    if slug_or_from(body.slug.as_deref(), &body.name).is_empty() {
        return Err(AppError::bad_request("Unable to derive a slug from the name"));
    }
    Ok(ApiResponse::created(state.visa_country.create(&body).await?))
}

#[instrument(skip(state, body))]
pub async fn update_visa_country(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateVisaCountryDTO>,
) -> ApiResult<VisaCountry> {
    if state.visa_country.read(&id).await?.is_none() {
        return Err(AppError::not_found("Visa country not found"));
    }
    Ok(ApiResponse::ok(state.visa_country.update(&id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_visa_country(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.visa_country.delete(&id).await? {
        return Err(AppError::not_found("Visa country not found"));
    }
    Ok(message("Visa country deleted"))
}

// ************************* TIPOLOGIE ************************* //

#[instrument(skip(state))]
pub async fn list_visa_types(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VisaTypeListQuery>,
) -> ApiResult<Vec<VisaType>> {
    Ok(ApiResponse::paginated(state.visa_type.list(&query).await?))
}

#[instrument(skip(state))]
pub async fn get_visa_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<VisaType> {
    let visa_type = state
        .visa_type
        .read(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Visa type not found"))?;
    Ok(ApiResponse::ok(visa_type))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_visa_type(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateVisaTypeDTO>,
) -> ApiCreated<VisaType> {
    if state.visa_country.read(&body.visa_country_id).await?.is_none() {
        return Err(AppError::bad_request("Visa country does not exist"));
    }
    Ok(ApiResponse::created(state.visa_type.create(&body).await?))
}

#[instrument(skip(state, body))]
pub async fn update_visa_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateVisaTypeDTO>,
) -> ApiResult<VisaType> {
    if state.visa_type.read(&id).await?.is_none() {
        return Err(AppError::not_found("Visa type not found"));
    }
    Ok(ApiResponse::ok(state.visa_type.update(&id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_visa_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.visa_type.delete(&id).await? {
        return Err(AppError::not_found("Visa type not found"));
    }
    Ok(message("Visa type deleted"))
}

// ************************* REQUISITI ************************* //

#[instrument(skip(state))]
pub async fn list_visa_requirements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VisaRequirementListQuery>,
) -> ApiResult<Vec<VisaRequirement>> {
    Ok(ApiResponse::paginated(state.visa_requirement.list(&query).await?))
}

#[instrument(skip(state))]
pub async fn get_visa_requirement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<VisaRequirement> {
    let requirement = state
        .visa_requirement
        .read(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Visa requirement not found"))?;
    Ok(ApiResponse::ok(requirement))
}

#[instrument(skip(state, body), fields(title = %body.title))]
pub async fn create_visa_requirement(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateVisaRequirementDTO>,
) -> ApiCreated<VisaRequirement> {
    if state.visa_type.read(&body.visa_type_id).await?.is_none() {
        return Err(AppError::bad_request("Visa type does not exist"));
    }
    Ok(ApiResponse::created(state.visa_requirement.create(&body).await?))
}

#[instrument(skip(state, body))]
pub async fn update_visa_requirement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateVisaRequirementDTO>,
) -> ApiResult<VisaRequirement> {
    if state.visa_requirement.read(&id).await?.is_none() {
        return Err(AppError::not_found("Visa requirement not found"));
    }
    Ok(ApiResponse::ok(state.visa_requirement.update(&id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_visa_requirement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.visa_requirement.delete(&id).await? {
        return Err(AppError::not_found("Visa requirement not found"));
    }
    Ok(message("Visa requirement deleted"))
}
