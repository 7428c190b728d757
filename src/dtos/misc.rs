//! DTOs per wishlist, notifiche, upload e ricerca

use crate::core::PageParams;
use crate::entities::{Blog, Course, Resume, University};
use crate::external::ObjectStorage;
use crate::dtos::BlogDTO;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct AddWishlistDTO {
    #[validate(range(min = 1, message = "Course is required"))]
    pub course_id: i32,
}

#[derive(Deserialize, Debug, Validate)]
pub struct CreateNotificationDTO {
    /// `None` = broadcast a tutti gli utenti
    pub user_id: Option<i32>,
    #[validate(length(min = 2, max = 190, message = "Title must be between 2 and 190 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: String,
    #[validate(length(max = 255))]
    pub link: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NotificationListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub user_id: Option<i32>,
    #[serde(default)]
    pub unread_only: bool,
}

impl NotificationListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// Risposta di un upload riuscito
#[derive(Serialize, Debug)]
pub struct UploadResponseDTO {
    pub key: String,
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Serialize, Debug)]
pub struct ResumeDTO {
    pub id: i32,
    pub user_id: i32,
    pub file_name: String,
    pub object_key: String,
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl ResumeDTO {
    pub fn from_resume(resume: Resume, storage: &dyn ObjectStorage) -> Self {
        let url = storage.public_url(&resume.object_key);
        Self {
            id: resume.id,
            user_id: resume.user_id,
            file_name: resume.file_name,
            object_key: resume.object_key,
            url,
            content_type: resume.content_type,
            size_bytes: resume.size_bytes,
            created_at: resume.created_at,
        }
    }
}

/// Risultati della ricerca aggregata
#[derive(Serialize, Debug)]
pub struct SearchResultsDTO {
    pub query: String,
    pub universities: Vec<University>,
    pub courses: Vec<Course>,
    pub blogs: Vec<BlogDTO>,
}

impl SearchResultsDTO {
    pub fn new(
        query: String,
        universities: Vec<University>,
        courses: Vec<Course>,
        blogs: Vec<Blog>,
        storage: &dyn ObjectStorage,
    ) -> Self {
        Self {
            query,
            universities,
            courses,
            blogs: blogs
                .into_iter()
                .map(|b| BlogDTO::from_blog(b, storage))
                .collect(),
        }
    }
}
