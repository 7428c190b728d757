//! JobRepository - Offerte di lavoro (`job_opprtunities`) e candidature (`job_applies`)

use super::{Create, Delete, Read, Update};
use crate::core::{ListQuery, Page, PageParams, SqlFilter, UpdateBuilder};
use crate::dtos::{ApplyJobDTO, CreateJobDTO, JobListQuery, UpdateJobDTO};
use crate::entities::{Job, JobApplication};
use sqlx::{Error, MySqlPool};
use tracing::instrument;

const JOB_SELECT: &str = "SELECT id, title, company, location, job_type, salary_range, description, \
     requirements, deadline, is_active, created_at FROM job_opprtunities";
const APPLICATION_SELECT: &str = "SELECT id, job_id, user_id, full_name, email, phone, resume_key, \
     cover_letter, created_at FROM job_applies";

pub struct JobRepository {
    connection_pool: MySqlPool,
}

impl JobRepository {
    pub fn new(connection_pool: MySqlPool) -> JobRepository {
        Self { connection_pool }
    }

    /// `active_only` forza il filtro per il sito pubblico, altrimenti vale `query.is_active`
    #[instrument(skip(self))]
    pub async fn list(&self, query: &JobListQuery, active_only: bool) -> Result<Page<Job>, Error> {
        let mut filter = SqlFilter::new()
            .eq_text("location", query.location.as_deref())
            .eq_text("job_type", query.job_type.as_deref())
            .search(&["title", "company", "location"], query.search.as_deref());
        filter = if active_only {
            filter.raw("is_active = TRUE")
        } else {
            filter.eq_opt("is_active", query.is_active)
        };
        ListQuery::new(JOB_SELECT, "SELECT COUNT(*) FROM job_opprtunities")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    pub async fn find_active(&self, id: i32) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!("{} WHERE id = ? AND is_active = TRUE", JOB_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn applications(&self, job_id: i32, params: PageParams) -> Result<Page<JobApplication>, Error> {
        ListQuery::new(APPLICATION_SELECT, "SELECT COUNT(*) FROM job_applies")
            .filter(SqlFilter::new().eq("job_id", job_id))
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, params)
            .await
    }

    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn apply(
        &self,
        job_id: i32,
        user_id: Option<i32>,
        data: &ApplyJobDTO,
    ) -> Result<JobApplication, Error> {
        let result = sqlx::query(
            "INSERT INTO job_applies (job_id, user_id, full_name, email, phone, resume_key, cover_letter) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(job_id)
        .bind(user_id)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.resume_key)
        .bind(&data.cover_letter)
        .execute(&self.connection_pool)
        .await?;
        sqlx::query_as::<_, JobApplication>(&format!("{} WHERE id = ?", APPLICATION_SELECT))
            .bind(result.last_insert_id() as i32)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Create<Job, CreateJobDTO> for JobRepository {
    async fn create(&self, data: &CreateJobDTO) -> Result<Job, Error> {
        let result = sqlx::query(
            "INSERT INTO job_opprtunities \
             (title, company, location, job_type, salary_range, description, requirements, deadline, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.title)
        .bind(&data.company)
        .bind(&data.location)
        .bind(&data.job_type)
        .bind(&data.salary_range)
        .bind(&data.description)
        .bind(&data.requirements)
        .bind(data.deadline)
        .bind(data.is_active)
        .execute(&self.connection_pool)
        .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Job, i32> for JobRepository {
    async fn read(&self, id: &i32) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!("{} WHERE id = ?", JOB_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Job, UpdateJobDTO, i32> for JobRepository {
    async fn update(&self, id: &i32, data: &UpdateJobDTO) -> Result<Job, Error> {
        let mut update = UpdateBuilder::new("job_opprtunities");
        update
            .set("title", data.title.clone())
            .set("company", data.company.clone())
            .set("location", data.location.clone())
            .set("job_type", data.job_type.clone())
            .set("salary_range", data.salary_range.clone())
            .set("description", data.description.clone())
            .set("requirements", data.requirements.clone())
            .set("deadline", data.deadline)
            .set("is_active", data.is_active);
        update.execute("id", *id, &self.connection_pool).await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for JobRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM job_opprtunities WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
