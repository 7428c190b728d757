//! Catalog services - Università, materie, corsi e destinazioni di studio

use crate::core::response::message;
use crate::core::slug::slug_or_from;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Path, Query, ValidatedJson};
use crate::dtos::{
    CourseListQuery, CreateCountryDTO, CreateCourseDTO, CreateUniversityDTO, PageQuery,
    SubjectDTO, UniversityDetailDTO, UniversityListQuery, UpdateCountryDTO, UpdateCourseDTO,
    UpdateUniversityDTO,
};
use crate::entities::{Country, Course, Subject, University};
use crate::repositories::{Create, Delete, Read, Update};
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Slug esplicito o derivato dal nome; deve contenere almeno un carattere utile
fn resolve_slug(slug: Option<&str>, name: &str) -> Result<String, AppError> {
    let slug = slug_or_from(slug, name);
    if slug.is_empty() {
        return Err(AppError::bad_request("Unable to derive a slug from the name"));
    }
    Ok(slug)
}

// ************************* UNIVERSITÀ ************************* //

#[instrument(skip(state))]
pub async fn list_universities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UniversityListQuery>,
) -> ApiResult<Vec<University>> {
    let page = state.university.list(&query).await?;
    info!("Found {} universities", page.pagination.total_items);
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state))]
pub async fn get_university(
    State(state): State<Arc<AppState>>,
    Path(university_id): Path<i32>,
) -> ApiResult<University> {
    let university = state
        .university
        .read(&university_id)
        .await?
        .ok_or_else(|| AppError::not_found("University not found"))?;
    Ok(ApiResponse::ok(university))
}

/// Pagina pubblica: università con l'elenco dei suoi corsi
#[instrument(skip(state))]
pub async fn get_university_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<UniversityDetailDTO> {
    let university = state
        .university
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("University not found"))?;
    let courses = state.course.list_by_university(university.id).await?;
    Ok(ApiResponse::ok(UniversityDetailDTO { university, courses }))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_university(
    State(state): State<Arc<AppState>>,
    ValidatedJson(mut body): ValidatedJson<CreateUniversityDTO>,
) -> ApiCreated<University> {
    // 1. Derivare lo slug dal nome se non fornito
    // 2. Slug già usato -> BAD_REQUEST
    // 3. Inserire e ritornare l'università con il nome del paese
    let slug = resolve_slug(body.slug.as_deref(), &body.name)?;
    if state.university.slug_taken(&slug, None).await? {
        warn!(%slug, "University slug already in use");
        return Err(AppError::bad_request("Slug already in use"));
    }
    body.slug = Some(slug);

    let university = state.university.create(&body).await?;
    info!(university_id = university.id, "University created");
    Ok(ApiResponse::created(university))
}

#[instrument(skip(state, body))]
pub async fn update_university(
    State(state): State<Arc<AppState>>,
    Path(university_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateUniversityDTO>,
) -> ApiResult<University> {
    if state.university.read(&university_id).await?.is_none() {
        return Err(AppError::not_found("University not found"));
    }
    if let Some(slug) = &body.slug {
        if state.university.slug_taken(slug, Some(university_id)).await? {
            return Err(AppError::bad_request("Slug already in use"));
        }
    }
    let university = state.university.update(&university_id, &body).await?;
    Ok(ApiResponse::ok(university))
}

#[instrument(skip(state))]
pub async fn delete_university(
    State(state): State<Arc<AppState>>,
    Path(university_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.university.delete(&university_id).await? {
        return Err(AppError::not_found("University not found"));
    }
    info!("University deleted");
    Ok(message("University deleted"))
}

// ************************* MATERIE ************************* //

/// Lista pubblica completa, in ordine alfabetico
#[instrument(skip(state))]
pub async fn list_all_subjects(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Subject>> {
    Ok(ApiResponse::ok(state.subject.list_all().await?))
}

#[instrument(skip(state))]
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<Subject>> {
    let page = state
        .subject
        .list(query.search.as_deref(), query.page_params())
        .await?;
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<i32>,
) -> ApiResult<Subject> {
    let subject = state
        .subject
        .read(&subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject not found"))?;
    Ok(ApiResponse::ok(subject))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<SubjectDTO>,
) -> ApiCreated<Subject> {
    resolve_slug(body.slug.as_deref(), &body.name)?;
    Ok(ApiResponse::created(state.subject.create(&body).await?))
}

#[instrument(skip(state, body))]
pub async fn update_subject(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<SubjectDTO>,
) -> ApiResult<Subject> {
    if state.subject.read(&subject_id).await?.is_none() {
        return Err(AppError::not_found("Subject not found"));
    }
    resolve_slug(body.slug.as_deref(), &body.name)?;
    Ok(ApiResponse::ok(state.subject.update(&subject_id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.subject.delete(&subject_id).await? {
        return Err(AppError::not_found("Subject not found"));
    }
    Ok(message("Subject deleted"))
}

// ************************* CORSI ************************* //

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseListQuery>,
) -> ApiResult<Vec<Course>> {
    if let (Some(min), Some(max)) = (query.min_fee, query.max_fee) {
        if min > max {
            return Err(AppError::bad_request("min_fee cannot be greater than max_fee"));
        }
    }
    let page = state.course.list(&query).await?;
    info!("Found {} courses", page.pagination.total_items);
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i32>,
) -> ApiResult<Course> {
    let course = state
        .course
        .read(&course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    Ok(ApiResponse::ok(course))
}

#[instrument(skip(state))]
pub async fn get_course_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Course> {
    let course = state
        .course
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;
    Ok(ApiResponse::ok(course))
}

#[instrument(skip(state, body), fields(title = %body.title))]
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    ValidatedJson(mut body): ValidatedJson<CreateCourseDTO>,
) -> ApiCreated<Course> {
    // 1. L'università deve esistere (la materia è verificata dalla foreign key)
    // 2. Slug derivato dal titolo se assente, univoco
    if state.university.read(&body.university_id).await?.is_none() {
        return Err(AppError::bad_request("University does not exist"));
    }
    let slug = resolve_slug(body.slug.as_deref(), &body.title)?;
    if state.course.slug_taken(&slug, None).await? {
        return Err(AppError::bad_request("Slug already in use"));
    }
    body.slug = Some(slug);

    let course = state.course.create(&body).await?;
    info!(course_id = course.id, "Course created");
    Ok(ApiResponse::created(course))
}

#[instrument(skip(state, body))]
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateCourseDTO>,
) -> ApiResult<Course> {
    if state.course.read(&course_id).await?.is_none() {
        return Err(AppError::not_found("Course not found"));
    }
    if let Some(slug) = &body.slug {
        if state.course.slug_taken(slug, Some(course_id)).await? {
            return Err(AppError::bad_request("Slug already in use"));
        }
    }
    Ok(ApiResponse::ok(state.course.update(&course_id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.course.delete(&course_id).await? {
        return Err(AppError::not_found("Course not found"));
    }
    Ok(message("Course deleted"))
}

// ************************* DESTINAZIONI ************************* //

#[instrument(skip(state))]
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<Country>> {
    let page = state
        .country
        .list(query.search.as_deref(), query.page_params())
        .await?;
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state))]
pub async fn get_country(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<i32>,
) -> ApiResult<Country> {
    let country = state
        .country
        .read(&country_id)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;
    Ok(ApiResponse::ok(country))
}

#[instrument(skip(state))]
pub async fn get_country_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Country> {
    let country = state
        .country
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;
    Ok(ApiResponse::ok(country))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_country(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateCountryDTO>,
) -> ApiCreated<Country> {
    resolve_slug(body.slug.as_deref(), &body.name)?;
    let country = state.country.create(&body).await?;
    info!(country_id = country.id, "Destination created");
    Ok(ApiResponse::created(country))
}

#[instrument(skip(state, body))]
pub async fn update_country(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateCountryDTO>,
) -> ApiResult<Country> {
    if state.country.read(&country_id).await?.is_none() {
        return Err(AppError::not_found("Country not found"));
    }
    Ok(ApiResponse::ok(state.country.update(&country_id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_country(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.country.delete(&country_id).await? {
        return Err(AppError::not_found("Country not found"));
    }
    Ok(message("Country deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug(None, "University of Melbourne").unwrap(), "university-of-melbourne");
        assert_eq!(resolve_slug(Some("uom"), "University of Melbourne").unwrap(), "uom");
        assert!(resolve_slug(None, "???").is_err());
    }
}
