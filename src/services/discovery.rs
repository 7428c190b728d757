//! Discovery services - Ricerca aggregata e geografia di riferimento

use crate::core::{ApiResponse, ApiResult, AppError, AppState, Path, Query};
use crate::dtos::{SearchQuery, SearchResultsDTO};
use crate::entities::{GeoCity, GeoCountry, GeoState};
use axum::extract::State;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const DEFAULT_SEARCH_LIMIT: u32 = 5;
const MAX_SEARCH_LIMIT: u32 = 20;

#[instrument(skip(state))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResultsDTO> {
    // 1. `q` obbligatorio e non vuoto
    // 2. Le tre ricerche partono in parallelo, il primo errore le annulla tutte
    let term = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::bad_request("Search query is required"))?
        .to_string();
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    debug!(%term, limit, "Running aggregated search");
    let (universities, courses, blogs) = tokio::try_join!(
        state.university.search_top(&term, limit),
        state.course.search_top(&term, limit),
        state.blog.search_top(&term, limit),
    )?;

    info!(
        universities = universities.len(),
        courses = courses.len(),
        blogs = blogs.len(),
        "Search completed"
    );
    Ok(ApiResponse::ok(SearchResultsDTO::new(
        term,
        universities,
        courses,
        blogs,
        state.storage.as_ref(),
    )))
}

#[instrument(skip(state))]
pub async fn list_geo_countries(State(state): State<Arc<AppState>>) -> ApiResult<Vec<GeoCountry>> {
    Ok(ApiResponse::ok(state.geo.countries().await?))
}

#[instrument(skip(state))]
pub async fn list_geo_states(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<i32>,
) -> ApiResult<Vec<GeoState>> {
    if !state.geo.country_exists(country_id).await? {
        return Err(AppError::not_found("Country not found"));
    }
    Ok(ApiResponse::ok(state.geo.states(country_id).await?))
}

#[instrument(skip(state))]
pub async fn list_geo_cities(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<i32>,
) -> ApiResult<Vec<GeoCity>> {
    if !state.geo.state_exists(state_id).await? {
        return Err(AppError::not_found("State not found"));
    }
    Ok(ApiResponse::ok(state.geo.cities(state_id).await?))
}
