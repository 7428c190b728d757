//! SubjectRepository - Repository per le aree disciplinari

use super::{Create, Delete, Read, Update};
use crate::core::slug::slug_or_from;
use crate::core::{ListQuery, Page, PageParams, SqlFilter};
use crate::dtos::SubjectDTO;
use crate::entities::Subject;
use sqlx::{Error, MySqlPool};

const SUBJECT_SELECT: &str = "SELECT id, name, slug, created_at FROM subjects";

pub struct SubjectRepository {
    connection_pool: MySqlPool,
}

impl SubjectRepository {
    pub fn new(connection_pool: MySqlPool) -> SubjectRepository {
        Self { connection_pool }
    }

    /// Tutte le materie in ordine alfabetico (lista pubblica, non paginata)
    pub async fn list_all(&self) -> Result<Vec<Subject>, Error> {
        sqlx::query_as::<_, Subject>(&format!("{} ORDER BY name ASC", SUBJECT_SELECT))
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn list(&self, search: Option<&str>, params: PageParams) -> Result<Page<Subject>, Error> {
        ListQuery::new(SUBJECT_SELECT, "SELECT COUNT(*) FROM subjects")
            .filter(SqlFilter::new().search(&["name"], search))
            .order_by("name ASC")
            .fetch_page(&self.connection_pool, params)
            .await
    }
}

impl Create<Subject, SubjectDTO> for SubjectRepository {
    async fn create(&self, data: &SubjectDTO) -> Result<Subject, Error> {
        let result = sqlx::query("INSERT INTO subjects (name, slug) VALUES (?, ?)")
            .bind(&data.name)
            .bind(slug_or_from(data.slug.as_deref(), &data.name))
            .execute(&self.connection_pool)
            .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Subject, i32> for SubjectRepository {
    async fn read(&self, id: &i32) -> Result<Option<Subject>, Error> {
        sqlx::query_as::<_, Subject>(&format!("{} WHERE id = ?", SUBJECT_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Subject, SubjectDTO, i32> for SubjectRepository {
    async fn update(&self, id: &i32, data: &SubjectDTO) -> Result<Subject, Error> {
        sqlx::query("UPDATE subjects SET name = ?, slug = ? WHERE id = ?")
            .bind(&data.name)
            .bind(slug_or_from(data.slug.as_deref(), &data.name))
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for SubjectRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
