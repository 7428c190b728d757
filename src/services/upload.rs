//! Upload services - Immagini dell'area admin e CV degli utenti

use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Query};
use crate::dtos::{PageQuery, ResumeDTO, UploadResponseDTO};
use crate::entities::User;
use crate::external::{ImageRecord, object_key};
use crate::repositories::NewResume;
use axum::{
    Extension,
    extract::{Multipart, State},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// File letto dal campo multipart `file`
struct UploadedFile {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Legge il primo campo `file` del form, verificando tipo e dimensione
async fn read_file_field(
    multipart: &mut Multipart,
    allowed_types: &[&str],
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        AppError::bad_request("Invalid multipart body").with_details(e.body_text())
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !allowed_types.contains(&content_type.as_str()) {
            warn!(%content_type, "Rejected upload with unsupported type");
            return Err(AppError::bad_request("Unsupported file type")
                .with_details(format!("Allowed types: {}", allowed_types.join(", "))));
        }

        let data = field.bytes().await.map_err(|e| {
            warn!("Failed to read uploaded file: {}", e);
            AppError::bad_request("File too large or unreadable").with_details(e.body_text())
        })?;

        if data.is_empty() {
            return Err(AppError::bad_request("Uploaded file is empty"));
        }
        if data.len() > max_bytes {
            return Err(AppError::bad_request("File too large")
                .with_details(format!("Maximum size: {} bytes", max_bytes)));
        }

        debug!(%file_name, size = data.len(), "File field read");
        return Ok(UploadedFile {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Err(AppError::bad_request("No file provided"))
}

// ************************* IMMAGINI ************************* //

#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.id))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    mut multipart: Multipart,
) -> ApiCreated<UploadResponseDTO> {
    // 1. Lettura e validazione del file
    // 2. Upload nello storage
    // 3. Registrazione nel ledger; se fallisce l'oggetto viene rimosso
    let file = read_file_field(&mut multipart, IMAGE_TYPES, state.max_upload_bytes).await?;
    let key = object_key("images", &file.file_name, &file.content_type);
    let stored = state.storage.put(&key, file.data, &file.content_type).await?;

    let record = ImageRecord {
        key: stored.key.clone(),
        url: stored.url.clone(),
        file_name: file.file_name.clone(),
        content_type: file.content_type.clone(),
        size: stored.size,
        uploaded_by: current_user.id,
        uploaded_at: Utc::now(),
    };
    if let Err(e) = state.images.append(record).await {
        if let Err(cleanup) = state.storage.delete(&stored.key).await {
            warn!("Could not remove unrecorded image {}: {}", stored.key, cleanup);
        }
        return Err(e.into());
    }

    info!(key = %stored.key, "Image uploaded");
    Ok(ApiResponse::created(UploadResponseDTO {
        key: stored.key,
        url: stored.url,
        file_name: file.file_name,
        content_type: file.content_type,
        size: stored.size,
    }))
}

#[instrument(skip(state))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<ImageRecord>> {
    Ok(ApiResponse::paginated(state.images.page(query.page_params()).await))
}

// ************************* CV ************************* //

#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.id))]
pub async fn upload_resume(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    mut multipart: Multipart,
) -> ApiCreated<ResumeDTO> {
    let file = read_file_field(&mut multipart, RESUME_TYPES, state.max_upload_bytes).await?;
    let key = object_key("resumes", &file.file_name, &file.content_type);
    let stored = state.storage.put(&key, file.data, &file.content_type).await?;

    let row = NewResume {
        user_id: current_user.id,
        file_name: file.file_name,
        object_key: stored.key.clone(),
        content_type: file.content_type,
        size_bytes: stored.size as i64,
    };
    let resume = match state.resume.create(&row).await {
        Ok(resume) => resume,
        Err(e) => {
            // nessuna riga: l'oggetto resterebbe orfano
            if let Err(cleanup) = state.storage.delete(&stored.key).await {
                warn!("Could not remove orphaned resume {}: {}", stored.key, cleanup);
            }
            return Err(e.into());
        }
    };

    info!(resume_id = resume.id, "Resume uploaded");
    Ok(ApiResponse::created(ResumeDTO::from_resume(
        resume,
        state.storage.as_ref(),
    )))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_my_resumes(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<ResumeDTO>> {
    let page = state
        .resume
        .list(Some(current_user.id), query.search.as_deref(), query.page_params())
        .await?;
    let storage = state.storage.as_ref();
    Ok(ApiResponse::paginated(
        page.map(|r| ResumeDTO::from_resume(r, storage)),
    ))
}

#[instrument(skip(state))]
pub async fn list_resumes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<ResumeDTO>> {
    let page = state
        .resume
        .list(None, query.search.as_deref(), query.page_params())
        .await?;
    let storage = state.storage.as_ref();
    Ok(ApiResponse::paginated(
        page.map(|r| ResumeDTO::from_resume(r, storage)),
    ))
}
