use crate::core::{AppError, AppState};
use crate::entities::{Role, User};
use crate::repositories::Read;
use axum::extract::State;
use axum::{
    body::Body,
    extract::Request,
    http::{self, HeaderMap, Response},
    middleware::Next,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Nome del cookie HttpOnly che trasporta il token
pub const AUTH_COOKIE: &str = "university-token";

// struct che codifica il contenuto del token jwt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[instrument(skip(user, secret), fields(user_id = %user.id, role = %user.role))]
pub fn encode_jwt(user: &User, secret: &str, ttl_hours: i64) -> Result<String, AppError> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let exp = (now + Duration::hours(ttl_hours)).timestamp() as usize;
    let iat = now.timestamp() as usize;
    let claims = Claims {
        iat,
        exp,
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        AppError::unauthorized("Invalid or expired token")
    })
}

/// Cookie di sessione: HttpOnly, SameSite=Lax, valido per tutto il sito
pub fn auth_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        AUTH_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Cookie scaduto, forza il logout lato client
pub fn clear_auth_cookie(secure: bool) -> String {
    auth_cookie("", 0, secure)
}

/// Estrae il token dal cookie `university-token` oppure dall'header `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = extract_token(req.headers()).ok_or_else(|| {
        warn!("Missing authentication token");
        AppError::unauthorized("Authentication required")
    })?;

    let token_data = decode_jwt(&token, &state.jwt_secret)?;

    // Il ruolo viene riletto dal database, non ci si fida solo del token
    let current_user = match state.user.read(&token_data.claims.id).await? {
        Some(user) => {
            debug!("User authenticated: {}", user.id);
            user
        }
        None => {
            warn!("User in token not found in database: {}", token_data.claims.id);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Middleware per le route interne: richiede un utente autenticato con ruolo admin.
/// Va applicato dopo `authentication_middleware`.
#[instrument(skip(req, next))]
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response<Body>, AppError> {
    let current_user = req.extensions().get::<User>().ok_or_else(|| {
        warn!("User not found in request extensions");
        AppError::unauthorized("Authentication required")
    })?;
    require_role(current_user, &[Role::Admin])?;
    Ok(next.run(req).await)
}

/// Verifica che l'utente abbia uno dei ruoli richiesti
pub fn require_role(user: &User, allowed_roles: &[Role]) -> Result<(), AppError> {
    if !allowed_roles.contains(&user.role) {
        warn!(
            "User {} has insufficient role {}, required one of: {:?}",
            user.id, user.role, allowed_roles
        );
        return Err(AppError::unauthorized("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }

    info!("Role check passed for user {} with role {}", user.id, user.role);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    const SECRET: &str = "test-secret";

    fn sample_user(role: Role) -> User {
        User {
            id: 42,
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            password: String::new(),
            phone: None,
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trips_user_identity() {
        let user = sample_user(Role::Consultant);
        let token = encode_jwt(&user, SECRET, 24).unwrap();
        let claims = decode_jwt(&token, SECRET).unwrap().claims;

        assert_eq!(claims.id, 42);
        assert_eq!(claims.name, "Asha Rao");
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role, Role::Consultant);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = encode_jwt(&sample_user(Role::Student), SECRET, 24).unwrap();
        let err = decode_jwt(&token, "other-secret").unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = encode_jwt(&sample_user(Role::Student), SECRET, -2).unwrap();
        assert!(decode_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn test_extract_token_prefers_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("theme=dark; university-token=abc.def.ghi"),
        );
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer other"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_token_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer xyz"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = auth_cookie("tok", 3600, true);
        assert!(cookie.starts_with("university-token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));
        assert!(clear_auth_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&sample_user(Role::Admin), &[Role::Admin]).is_ok());
        let err = require_role(&sample_user(Role::Student), &[Role::Admin]).unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
    }
}
