//! Student area services - Consulenti, wishlist e notifiche

use crate::core::auth::require_role;
use crate::core::response::message;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Path, Query, ValidatedJson};
use crate::dtos::{AddWishlistDTO, ConsultantListQuery, CreateNotificationDTO, NotificationListQuery};
use crate::entities::{Consultant, Notification, Role, User, WishlistItem};
use crate::repositories::{Create, Delete, Read};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ************************* CONSULENTI ************************* //

#[instrument(skip(state))]
pub async fn list_consultants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConsultantListQuery>,
) -> ApiResult<Vec<Consultant>> {
    Ok(ApiResponse::paginated(state.user.list_consultants(&query).await?))
}

// ************************* WISHLIST ************************* //

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> ApiResult<Vec<WishlistItem>> {
    require_role(&current_user, &[Role::Student])?;
    Ok(ApiResponse::ok(state.wishlist.list_for_user(current_user.id).await?))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id, course_id = %body.course_id))]
pub async fn add_to_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    ValidatedJson(body): ValidatedJson<AddWishlistDTO>,
) -> Result<(StatusCode, Json<ApiResponse<WishlistItem>>), AppError> {
    // 1. Solo studenti
    // 2. Il corso deve esistere
    // 3. Coppia già presente -> 200 con la riga esistente, altrimenti 201
    require_role(&current_user, &[Role::Student])?;
    if state.course.read(&body.course_id).await?.is_none() {
        return Err(AppError::not_found("Course not found"));
    }

    let (item, created) = state.wishlist.add(current_user.id, body.course_id).await?;
    if created {
        info!("Course added to wishlist");
        Ok(ApiResponse::created(item))
    } else {
        debug!("Course already in wishlist");
        Ok((StatusCode::OK, ApiResponse::ok(item)))
    }
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn remove_from_wishlist(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(course_id): Path<i32>,
) -> ApiResult<Option<()>> {
    require_role(&current_user, &[Role::Student])?;
    if !state.wishlist.remove(current_user.id, course_id).await? {
        return Err(AppError::not_found("Course not in wishlist"));
    }
    Ok(message("Course removed from wishlist"))
}

// ************************* NOTIFICHE ************************* //

#[instrument(skip(state, body), fields(target = ?body.user_id))]
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateNotificationDTO>,
) -> ApiCreated<Notification> {
    if let Some(user_id) = body.user_id {
        if state.user.read(&user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }
    }
    let notification = state.notification.create(&body).await?;
    info!(notification_id = notification.id, "Notification created");
    Ok(ApiResponse::created(notification))
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Vec<Notification>> {
    Ok(ApiResponse::paginated(state.notification.list(&query).await?))
}

#[instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.notification.delete(&id).await? {
        return Err(AppError::not_found("Notification not found"));
    }
    Ok(message("Notification deleted"))
}

/// Notifiche personali più quelle broadcast
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_my_notifications(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Vec<Notification>> {
    let page = state
        .notification
        .list_visible(current_user.id, query.unread_only, query.page_params())
        .await?;
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(id): Path<i32>,
) -> ApiResult<Notification> {
    // le notifiche di altri utenti risultano inesistenti
    let mut notification = state
        .notification
        .find_visible(id, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Notification not found"))?;
    if !notification.is_read {
        state.notification.mark_read(id).await?;
        notification.is_read = true;
    }
    Ok(ApiResponse::ok(notification))
}
