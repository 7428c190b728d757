//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod external;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use crate::services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Margine per boundary e header multipart oltre alla dimensione massima del file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/frontend", configure_frontend_routes(state.clone()))
        .nest("/api/internal", configure_internal_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS: origine esplicita con cookie, altrimenti qualsiasi origine senza credenziali
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE];

    match origin.map(|o| (o, o.parse::<HeaderValue>())) {
        Some((_, Ok(value))) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        Some((raw, Err(_))) => {
            warn!("Invalid CORS_ORIGIN '{}', allowing any origin without credentials", raw);
            CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(headers)
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(headers),
    }
}

/// Configura le routes pubbliche del sito (`/api/frontend`)
fn configure_frontend_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::{auth, blog, catalog, discovery, job, lead, student, upload, visa};

    // Rotte che NON richiedono autenticazione
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_student))
        .route("/auth/consultant-register", post(auth::register_consultant))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/universities", get(catalog::list_universities))
        .route("/universities/{slug}", get(catalog::get_university_by_slug))
        .route("/subjects", get(catalog::list_all_subjects))
        .route("/courses", get(catalog::list_courses))
        .route("/courses/{slug}", get(catalog::get_course_by_slug))
        .route("/countries", get(catalog::list_countries))
        .route("/countries/{slug}", get(catalog::get_country_by_slug))
        .route("/search", get(discovery::search))
        .route("/geo/countries", get(discovery::list_geo_countries))
        .route("/geo/countries/{country_id}/states", get(discovery::list_geo_states))
        .route("/geo/states/{state_id}/cities", get(discovery::list_geo_cities))
        .route("/blog-categories", get(blog::list_all_categories))
        .route("/blogs", get(blog::list_published_blogs))
        .route("/blogs/{blog}", get(blog::get_blog_by_slug))
        .route("/blogs/{blog}/comments", get(blog::list_blog_comments))
        .route("/jobs", get(job::list_active_jobs))
        .route("/jobs/{job_id}", get(job::get_active_job))
        .route("/jobs/{job_id}/apply", post(job::apply_to_job))
        .route("/visas", get(visa::list_visa_countries))
        .route("/visas/{slug}", get(visa::get_visa_country_by_slug))
        .route("/free-consultations", post(lead::submit_free_consultation))
        .route("/leads/{kind}", post(lead::submit_lead))
        .route("/consultants", get(student::list_consultants));

    // Rotte che richiedono un utente autenticato (qualsiasi ruolo, salvo controlli nell'handler)
    let member_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/blogs/{blog}/comments", post(blog::create_comment))
        .route("/comments/{comment_id}/replies", post(blog::create_reply))
        .route(
            "/wishlist",
            get(student::get_wishlist).post(student::add_to_wishlist),
        )
        .route(
            "/wishlist/{course_id}",
            delete(student::remove_from_wishlist),
        )
        .route("/notifications", get(student::list_my_notifications))
        .route(
            "/notifications/{notification_id}/read",
            patch(student::mark_notification_read),
        )
        .route(
            "/resumes",
            get(upload::list_my_resumes).post(upload::upload_resume).layer(
                DefaultBodyLimit::max(state.max_upload_bytes + MULTIPART_OVERHEAD),
            ),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(member_routes)
}

/// Configura le routes del pannello di amministrazione (`/api/internal`)
fn configure_internal_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{admin_middleware, authentication_middleware};
    use crate::services::{auth, blog, catalog, job, lead, student, upload, visa};

    Router::new()
        .route("/admins", get(auth::list_admins).post(auth::create_admin))
        .route(
            "/universities",
            get(catalog::list_universities).post(catalog::create_university),
        )
        .route(
            "/universities/{id}",
            get(catalog::get_university)
                .put(catalog::update_university)
                .delete(catalog::delete_university),
        )
        .route(
            "/subjects",
            get(catalog::list_subjects).post(catalog::create_subject),
        )
        .route(
            "/subjects/{id}",
            get(catalog::get_subject)
                .put(catalog::update_subject)
                .delete(catalog::delete_subject),
        )
        .route(
            "/courses",
            get(catalog::list_courses).post(catalog::create_course),
        )
        .route(
            "/courses/{id}",
            get(catalog::get_course)
                .put(catalog::update_course)
                .delete(catalog::delete_course),
        )
        .route(
            "/countries",
            get(catalog::list_countries).post(catalog::create_country),
        )
        .route(
            "/countries/{id}",
            get(catalog::get_country)
                .put(catalog::update_country)
                .delete(catalog::delete_country),
        )
        .route(
            "/blog-categories",
            get(blog::list_categories).post(blog::create_category),
        )
        .route(
            "/blog-categories/{id}",
            get(blog::get_category)
                .put(blog::update_category)
                .delete(blog::delete_category),
        )
        .route("/blogs", get(blog::list_blogs).post(blog::create_blog))
        .route(
            "/blogs/{id}",
            get(blog::get_blog)
                .put(blog::update_blog)
                .delete(blog::delete_blog),
        )
        .route("/comments", get(blog::list_comments))
        .route("/comments/{id}", delete(blog::delete_comment))
        .route("/jobs", get(job::list_jobs).post(job::create_job))
        .route(
            "/jobs/{id}",
            get(job::get_job).put(job::update_job).delete(job::delete_job),
        )
        .route("/jobs/{id}/applications", get(job::list_applications))
        .route(
            "/visa-countries",
            get(visa::list_visa_countries).post(visa::create_visa_country),
        )
        .route(
            "/visa-countries/{id}",
            get(visa::get_visa_country)
                .put(visa::update_visa_country)
                .delete(visa::delete_visa_country),
        )
        .route(
            "/visa-types",
            get(visa::list_visa_types).post(visa::create_visa_type),
        )
        .route(
            "/visa-types/{id}",
            get(visa::get_visa_type)
                .put(visa::update_visa_type)
                .delete(visa::delete_visa_type),
        )
        .route(
            "/visa-requirements",
            get(visa::list_visa_requirements).post(visa::create_visa_requirement),
        )
        .route(
            "/visa-requirements/{id}",
            get(visa::get_visa_requirement)
                .put(visa::update_visa_requirement)
                .delete(visa::delete_visa_requirement),
        )
        .route("/free-consultations", get(lead::list_free_consultations))
        .route(
            "/free-consultations/{id}",
            get(lead::get_free_consultation).delete(lead::delete_free_consultation),
        )
        .route(
            "/free-consultations/{id}/status",
            patch(lead::update_free_consultation_status),
        )
        .route("/leads/{kind}", get(lead::list_leads))
        .route(
            "/leads/{kind}/{id}",
            get(lead::get_lead).delete(lead::delete_lead),
        )
        .route("/leads/{kind}/{id}/status", patch(lead::update_lead_status))
        .route("/consultants", get(student::list_consultants))
        .route(
            "/notifications",
            get(student::list_notifications).post(student::create_notification),
        )
        .route(
            "/notifications/{id}",
            delete(student::delete_notification),
        )
        .route(
            "/uploads/image",
            post(upload::upload_image).layer(DefaultBodyLimit::max(
                state.max_upload_bytes + MULTIPART_OVERHEAD,
            )),
        )
        .route("/uploads/images", get(upload::list_images))
        .route("/resumes", get(upload::list_resumes))
        // l'ultimo layer aggiunto è il primo ad essere eseguito: prima autenticazione, poi ruolo
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
