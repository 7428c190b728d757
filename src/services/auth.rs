//! Auth services - Registrazione, login, logout e profilo dell'utente corrente

use crate::core::auth::{auth_cookie, clear_auth_cookie};
use crate::core::response::message;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Query, ValidatedJson, encode_jwt};
use crate::dtos::{
    CreateAdminDTO, LoginDTO, LoginResponseDTO, NewUser, PageQuery, ProfileDTO,
    RegisterConsultantDTO, RegisterStudentDTO, UpdateProfileDTO, UserDTO,
};
use crate::entities::{ConsultantProfile, Role, StudentProfile, User};
use crate::external::CrmLead;
use crate::repositories::Create;
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_student(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegisterStudentDTO>,
) -> ApiCreated<UserDTO> {
    // 1. Il body è già validato dall'extractor (nome, email, password >= 8, telefono)
    // 2. Email già registrata -> BAD_REQUEST, nessun inserimento
    // 3. Hash della password
    // 4. Transazione: users + student_profiles
    // 5. Inoltro al CRM: se fallisce rollback e INTERNAL_SERVER_ERROR
    // 6. Commit e 201 con l'utente creato
    if state.user.email_exists(&body.email).await? {
        warn!("Registration attempted with an existing email");
        return Err(AppError::bad_request("Email already registered"));
    }

    let new_user = NewUser {
        name: body.name.clone(),
        email: body.email.clone(),
        password_hash: User::hash_password(&body.password)?,
        phone: Some(body.phone.clone()),
        role: Role::Student,
    };

    let mut tx = state.pool.begin().await?;
    let user_id = state.user.insert_tx(&mut *tx, &new_user).await?;
    let profile = StudentProfile {
        user_id,
        interested_country: body.interested_country.clone(),
        interested_course: body.interested_course.clone(),
        study_level: body.study_level.clone(),
        city: body.city.clone(),
    };
    state.user.insert_student_profile_tx(&mut *tx, &profile).await?;
    let user = state.user.read_tx(&mut *tx, user_id).await?;

    let lead = CrmLead {
        source: "student-registration",
        name: body.name,
        email: body.email,
        phone: Some(body.phone),
        country: body.interested_country,
        message: body.interested_course,
    };
    if let Err(e) = state.crm.forward(&lead).await {
        error!("CRM rejected student registration, rolling back: {}", e);
        tx.rollback().await?;
        return Err(e.into());
    }

    tx.commit().await?;
    info!(user_id, "Student registered");
    Ok(ApiResponse::created(UserDTO::from(user)))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_consultant(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegisterConsultantDTO>,
) -> ApiCreated<UserDTO> {
    // stesso flusso della registrazione studente, con consultant_profiles
    if state.user.email_exists(&body.email).await? {
        warn!("Consultant registration attempted with an existing email");
        return Err(AppError::bad_request("Email already registered"));
    }

    let new_user = NewUser {
        name: body.name.clone(),
        email: body.email.clone(),
        password_hash: User::hash_password(&body.password)?,
        phone: Some(body.phone.clone()),
        role: Role::Consultant,
    };

    let mut tx = state.pool.begin().await?;
    let user_id = state.user.insert_tx(&mut *tx, &new_user).await?;
    let profile = ConsultantProfile {
        user_id,
        company_name: body.company_name.clone(),
        license_number: body.license_number,
        city: body.city.clone(),
        experience_years: body.experience_years,
        bio: body.bio,
    };
    state.user.insert_consultant_profile_tx(&mut *tx, &profile).await?;
    let user = state.user.read_tx(&mut *tx, user_id).await?;

    let lead = CrmLead {
        source: "consultant-registration",
        name: body.name,
        email: body.email,
        phone: Some(body.phone),
        country: body.city,
        message: Some(body.company_name),
    };
    if let Err(e) = state.crm.forward(&lead).await {
        error!("CRM rejected consultant registration, rolling back: {}", e);
        tx.rollback().await?;
        return Err(e.into());
    }

    tx.commit().await?;
    info!(user_id, "Consultant registered");
    Ok(ApiResponse::created(UserDTO::from(user)))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginDTO>,
) -> Result<(HeaderMap, Json<ApiResponse<LoginResponseDTO>>), AppError> {
    // 1. Cercare l'utente per email, se non esiste UNAUTHORIZED
    // 2. Verificare la password con bcrypt, se non corrisponde UNAUTHORIZED (stesso messaggio)
    // 3. Generare il token con id, nome, email e ruolo
    // 4. Impostare il cookie HttpOnly `university-token` e l'header Authorization
    let user = match state.user.find_by_email(&body.email).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized("Invalid email or password"));
        }
    };

    if !user.verify_password(&body.password) {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = encode_jwt(&user, &state.jwt_secret, state.jwt_ttl_hours)?;
    let cookie = auth_cookie(&token, state.jwt_ttl_hours * 60 * 60, state.cookie_secure);

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, header_value(&cookie)?);
    headers.insert(header::AUTHORIZATION, header_value(&format!("Bearer {}", token))?);

    info!(user_id = user.id, role = %user.role, "User logged in");
    Ok((
        headers,
        ApiResponse::ok(LoginResponseDTO {
            user: UserDTO::from(user),
            token,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> Result<(HeaderMap, Json<ApiResponse<Option<()>>>), AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, header_value(&clear_auth_cookie(state.cookie_secure))?);
    Ok((headers, message("Logged out")))
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value).map_err(|e| {
        AppError::internal_server_error("Failed to build response headers").with_details(e.to_string())
    })
}

async fn load_profile(state: &AppState, user: User) -> Result<ProfileDTO, AppError> {
    let (student_profile, consultant_profile) = match user.role {
        Role::Student => (state.user.student_profile(user.id).await?, None),
        Role::Consultant => (None, state.user.consultant_profile(user.id).await?),
        Role::Admin => (None, None),
    };
    Ok(ProfileDTO {
        user: UserDTO::from(user),
        student_profile,
        consultant_profile,
    })
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>, // dal middleware di autenticazione
) -> ApiResult<ProfileDTO> {
    debug!("Loading current user profile");
    Ok(ApiResponse::ok(load_profile(&state, current_user).await?))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    ValidatedJson(body): ValidatedJson<UpdateProfileDTO>,
) -> ApiResult<ProfileDTO> {
    // users e profilo del ruolo vengono aggiornati nella stessa transazione
    let mut tx = state.pool.begin().await?;
    let updated = state
        .user
        .update_profile_tx(&mut *tx, current_user.id, current_user.role, &body)
        .await?;
    if !updated {
        warn!("Consultant profile row is missing and cannot be created");
        return Err(AppError::not_found("Consultant profile not found"));
    }
    let user = state.user.read_tx(&mut *tx, current_user.id).await?;
    tx.commit().await?;

    info!("Profile updated");
    Ok(ApiResponse::ok(load_profile(&state, user).await?))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateAdminDTO>,
) -> ApiCreated<UserDTO> {
    if state.user.email_exists(&body.email).await? {
        return Err(AppError::bad_request("Email already registered"));
    }

    let admin = state
        .user
        .create(&NewUser {
            name: body.name,
            email: body.email,
            password_hash: User::hash_password(&body.password)?,
            phone: body.phone,
            role: Role::Admin,
        })
        .await?;

    info!(admin_id = admin.id, "Admin created");
    Ok(ApiResponse::created(UserDTO::from(admin)))
}

#[instrument(skip(state))]
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<UserDTO>> {
    let page = state
        .user
        .list_by_role(Role::Admin, query.search.as_deref(), query.page_params())
        .await?;
    Ok(ApiResponse::paginated(page.map(UserDTO::from)))
}
