//! CourseRepository - Repository per i corsi, letti sempre in join con università e materia

use super::{Create, Delete, Read, Update};
use crate::core::slug::slug_or_from;
use crate::core::{ListQuery, Page, SqlFilter, UpdateBuilder};
use crate::dtos::{CourseListQuery, CreateCourseDTO, UpdateCourseDTO};
use crate::entities::Course;
use sqlx::{Error, MySqlPool};
use tracing::instrument;

const COURSE_SELECT: &str = "SELECT c.id, c.university_id, u.name AS university_name, u.slug AS university_slug, \
     co.name AS country_name, c.subject_id, s.name AS subject_name, c.title, c.slug, c.level, \
     c.duration_months, c.tuition_fee, c.currency, c.intake, c.qualification, c.description, c.created_at \
     FROM courses c \
     JOIN university_details u ON u.id = c.university_id \
     LEFT JOIN countries co ON co.id = u.country_id \
     LEFT JOIN subjects s ON s.id = c.subject_id";
const COURSE_COUNT: &str =
    "SELECT COUNT(*) FROM courses c JOIN university_details u ON u.id = c.university_id";

pub struct CourseRepository {
    connection_pool: MySqlPool,
}

impl CourseRepository {
    pub fn new(connection_pool: MySqlPool) -> CourseRepository {
        Self { connection_pool }
    }

    fn filter_for(query: &CourseListQuery) -> SqlFilter {
        SqlFilter::new()
            .eq_opt("c.university_id", query.university_id)
            .eq_opt("c.subject_id", query.subject_id)
            .eq_opt("c.level", query.level.map(|l| l.as_str()))
            .eq_opt("u.country_id", query.country_id)
            .gte_opt("c.tuition_fee", query.min_fee)
            .lte_opt("c.tuition_fee", query.max_fee)
            .search(&["c.title", "u.name"], query.search.as_deref())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &CourseListQuery) -> Result<Page<Course>, Error> {
        ListQuery::new(COURSE_SELECT, COURSE_COUNT)
            .filter(Self::filter_for(query))
            .order_by(query.sort.order_by())
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    pub async fn list_by_university(&self, university_id: i32) -> Result<Vec<Course>, Error> {
        sqlx::query_as::<_, Course>(&format!(
            "{} WHERE c.university_id = ? ORDER BY c.title ASC",
            COURSE_SELECT
        ))
        .bind(university_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn search_top(&self, term: &str, limit: u32) -> Result<Vec<Course>, Error> {
        ListQuery::new(COURSE_SELECT, COURSE_COUNT)
            .filter(SqlFilter::new().search(&["c.title", "s.name", "u.name"], Some(term)))
            .order_by("c.created_at DESC, c.id DESC")
            .fetch_top(&self.connection_pool, limit)
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>, Error> {
        sqlx::query_as::<_, Course>(&format!("{} WHERE c.slug = ?", COURSE_SELECT))
            .bind(slug)
            .fetch_optional(&self.connection_pool)
            .await
    }

    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE slug = ? AND id <> ?")
            .bind(slug)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }
}

impl Create<Course, CreateCourseDTO> for CourseRepository {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn create(&self, data: &CreateCourseDTO) -> Result<Course, Error> {
        let result = sqlx::query(
            "INSERT INTO courses \
             (university_id, subject_id, title, slug, level, duration_months, tuition_fee, currency, intake, qualification, description) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.university_id)
        .bind(data.subject_id)
        .bind(&data.title)
        .bind(slug_or_from(data.slug.as_deref(), &data.title))
        .bind(data.level.as_str())
        .bind(data.duration_months)
        .bind(data.tuition_fee)
        .bind(data.currency.as_ref().map(|c| c.to_ascii_uppercase()))
        .bind(&data.intake)
        .bind(&data.qualification)
        .bind(&data.description)
        .execute(&self.connection_pool)
        .await?;

        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Course, i32> for CourseRepository {
    async fn read(&self, id: &i32) -> Result<Option<Course>, Error> {
        sqlx::query_as::<_, Course>(&format!("{} WHERE c.id = ?", COURSE_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Course, UpdateCourseDTO, i32> for CourseRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i32, data: &UpdateCourseDTO) -> Result<Course, Error> {
        let mut update = UpdateBuilder::new("courses");
        update
            .set("university_id", data.university_id)
            .set("subject_id", data.subject_id)
            .set("title", data.title.clone())
            .set("slug", data.slug.clone())
            .set("level", data.level.map(|l| l.as_str()))
            .set("duration_months", data.duration_months)
            .set("tuition_fee", data.tuition_fee)
            .set("currency", data.currency.as_ref().map(|c| c.to_ascii_uppercase()))
            .set("intake", data.intake.clone())
            .set("qualification", data.qualification.clone())
            .set("description", data.description.clone());
        update.execute("id", *id, &self.connection_pool).await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for CourseRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::CourseSort;
    use crate::entities::CourseLevel;
    use sqlx::MySqlPool;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("catalog")))]
    async fn test_fee_range_and_level_filters(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = CourseRepository::new(pool);
        let page = repo
            .list(&CourseListQuery {
                level: Some(CourseLevel::Master),
                min_fee: Some(20000.0),
                max_fee: Some(40000.0),
                sort: CourseSort::FeeAsc,
                ..Default::default()
            })
            .await?;

        assert!(!page.items.is_empty());
        for course in &page.items {
            assert_eq!(course.level, CourseLevel::Master);
            let fee = course.tuition_fee.unwrap();
            assert!((20000.0..=40000.0).contains(&fee));
        }
        let fees: Vec<f64> = page.items.iter().filter_map(|c| c.tuition_fee).collect();
        assert!(fees.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("catalog")))]
    async fn test_pagination_counts_match_filter(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = CourseRepository::new(pool);
        let page = repo
            .list(&CourseListQuery {
                limit: Some(2),
                ..Default::default()
            })
            .await?;

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total_items, 5);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next_page);
        Ok(())
    }
}
