//! ResumeRepository - CV caricati dagli utenti

use crate::core::{ListQuery, Page, PageParams, SqlFilter};
use crate::entities::Resume;
use sqlx::{Error, MySqlPool};

const RESUME_SELECT: &str =
    "SELECT id, user_id, file_name, object_key, content_type, size_bytes, created_at FROM resumes";

/// Riga da inserire dopo l'upload nello storage
#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: i32,
    pub file_name: String,
    pub object_key: String,
    pub content_type: String,
    pub size_bytes: i64,
}

pub struct ResumeRepository {
    connection_pool: MySqlPool,
}

impl ResumeRepository {
    pub fn new(connection_pool: MySqlPool) -> ResumeRepository {
        Self { connection_pool }
    }

    pub async fn create(&self, data: &NewResume) -> Result<Resume, Error> {
        let result = sqlx::query(
            "INSERT INTO resumes (user_id, file_name, object_key, content_type, size_bytes) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(data.user_id)
        .bind(&data.file_name)
        .bind(&data.object_key)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .execute(&self.connection_pool)
        .await?;
        sqlx::query_as::<_, Resume>(&format!("{} WHERE id = ?", RESUME_SELECT))
            .bind(result.last_insert_id() as i32)
            .fetch_one(&self.connection_pool)
            .await
    }

    /// `user_id = None` per la lista admin
    pub async fn list(
        &self,
        user_id: Option<i32>,
        search: Option<&str>,
        params: PageParams,
    ) -> Result<Page<Resume>, Error> {
        let filter = SqlFilter::new()
            .eq_opt("user_id", user_id)
            .search(&["file_name"], search);
        ListQuery::new(RESUME_SELECT, "SELECT COUNT(*) FROM resumes")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, params)
            .await
    }
}
