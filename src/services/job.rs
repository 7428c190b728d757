//! Job services - Offerte di lavoro e candidature

use crate::core::response::message;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Path, Query, ValidatedJson};
use crate::dtos::{ApplyJobDTO, CreateJobDTO, JobListQuery, PageQuery, UpdateJobDTO};
use crate::entities::{Job, JobApplication};
use crate::repositories::{Create, Delete, Read, Update};
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Sito pubblico: solo offerte attive
#[instrument(skip(state))]
pub async fn list_active_jobs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Vec<Job>> {
    Ok(ApiResponse::paginated(state.job.list(&query, true).await?))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Vec<Job>> {
    Ok(ApiResponse::paginated(state.job.list(&query, false).await?))
}

#[instrument(skip(state))]
pub async fn get_active_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<i32>,
) -> ApiResult<Job> {
    let job = state
        .job
        .find_active(job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job not found"))?;
    Ok(ApiResponse::ok(job))
}

#[instrument(skip(state))]
pub async fn get_job(State(state): State<Arc<AppState>>, Path(job_id): Path<i32>) -> ApiResult<Job> {
    let job = state
        .job
        .read(&job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job not found"))?;
    Ok(ApiResponse::ok(job))
}

#[instrument(skip(state, body), fields(title = %body.title))]
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateJobDTO>,
) -> ApiCreated<Job> {
    let job = state.job.create(&body).await?;
    info!(job_id = job.id, "Job created");
    Ok(ApiResponse::created(job))
}

#[instrument(skip(state, body))]
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateJobDTO>,
) -> ApiResult<Job> {
    if state.job.read(&job_id).await?.is_none() {
        return Err(AppError::not_found("Job not found"));
    }
    Ok(ApiResponse::ok(state.job.update(&job_id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.job.delete(&job_id).await? {
        return Err(AppError::not_found("Job not found"));
    }
    Ok(message("Job deleted"))
}

#[instrument(skip(state))]
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<JobApplication>> {
    if state.job.read(&job_id).await?.is_none() {
        return Err(AppError::not_found("Job not found"));
    }
    let page = state.job.applications(job_id, query.page_params()).await?;
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn apply_to_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<ApplyJobDTO>,
) -> ApiCreated<JobApplication> {
    // offerta inesistente o non più attiva -> NOT_FOUND
    if state.job.find_active(job_id).await?.is_none() {
        warn!("Application to a missing or inactive job");
        return Err(AppError::not_found("Job not found"));
    }
    let application = state.job.apply(job_id, None, &body).await?;
    info!(application_id = application.id, "Job application received");
    Ok(ApiResponse::created(application))
}
