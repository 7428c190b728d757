//! UniversityRepository - Repository per le università (`university_details`)

use super::{Create, Delete, Read, Update};
use crate::core::slug::slug_or_from;
use crate::core::{ListQuery, Page, SqlFilter, UpdateBuilder};
use crate::dtos::{CreateUniversityDTO, UniversityListQuery, UpdateUniversityDTO};
use crate::entities::University;
use sqlx::{Error, MySqlPool};
use tracing::instrument;

const UNIVERSITY_SELECT: &str = "SELECT u.id, u.name, u.slug, u.country_id, c.name AS country_name, \
     u.city, u.university_type, u.ranking, u.established_year, u.website, u.logo, u.description, u.created_at \
     FROM university_details u LEFT JOIN countries c ON c.id = u.country_id";
const UNIVERSITY_COUNT: &str = "SELECT COUNT(*) FROM university_details u";
const UNIVERSITY_ORDER: &str = "u.created_at DESC, u.id DESC";

pub struct UniversityRepository {
    connection_pool: MySqlPool,
}

impl UniversityRepository {
    pub fn new(connection_pool: MySqlPool) -> UniversityRepository {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &UniversityListQuery) -> Result<Page<University>, Error> {
        let filter = SqlFilter::new()
            .eq_opt("u.country_id", query.country_id)
            .eq_text("u.city", query.city.as_deref())
            .eq_opt("u.university_type", query.university_type.map(|t| t.as_str()))
            .search(&["u.name", "u.city"], query.search.as_deref());
        ListQuery::new(UNIVERSITY_SELECT, UNIVERSITY_COUNT)
            .filter(filter)
            .order_by(UNIVERSITY_ORDER)
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    /// Primi `limit` risultati per la ricerca aggregata
    pub async fn search_top(&self, term: &str, limit: u32) -> Result<Vec<University>, Error> {
        ListQuery::new(UNIVERSITY_SELECT, UNIVERSITY_COUNT)
            .filter(SqlFilter::new().search(&["u.name", "u.city", "c.name"], Some(term)))
            .order_by("u.ranking IS NULL, u.ranking ASC, u.id DESC")
            .fetch_top(&self.connection_pool, limit)
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<University>, Error> {
        sqlx::query_as::<_, University>(&format!("{} WHERE u.slug = ?", UNIVERSITY_SELECT))
            .bind(slug)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Slug già in uso da un'altra università (`exclude_id` = quella in modifica)
    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM university_details WHERE slug = ? AND id <> ?")
                .bind(slug)
                .bind(exclude_id.unwrap_or(0))
                .fetch_one(&self.connection_pool)
                .await?;
        Ok(count > 0)
    }
}

impl Create<University, CreateUniversityDTO> for UniversityRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateUniversityDTO) -> Result<University, Error> {
        let result = sqlx::query(
            "INSERT INTO university_details \
             (name, slug, country_id, city, university_type, ranking, established_year, website, logo, description) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(slug_or_from(data.slug.as_deref(), &data.name))
        .bind(data.country_id)
        .bind(&data.city)
        .bind(data.university_type.as_str())
        .bind(data.ranking)
        .bind(data.established_year)
        .bind(&data.website)
        .bind(&data.logo)
        .bind(&data.description)
        .execute(&self.connection_pool)
        .await?;

        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<University, i32> for UniversityRepository {
    async fn read(&self, id: &i32) -> Result<Option<University>, Error> {
        sqlx::query_as::<_, University>(&format!("{} WHERE u.id = ?", UNIVERSITY_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<University, UpdateUniversityDTO, i32> for UniversityRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i32, data: &UpdateUniversityDTO) -> Result<University, Error> {
        let mut update = UpdateBuilder::new("university_details");
        update
            .set("name", data.name.clone())
            .set("slug", data.slug.clone())
            .set("country_id", data.country_id)
            .set("city", data.city.clone())
            .set("university_type", data.university_type.map(|t| t.as_str()))
            .set("ranking", data.ranking)
            .set("established_year", data.established_year)
            .set("website", data.website.clone())
            .set("logo", data.logo.clone())
            .set("description", data.description.clone());
        update.execute("id", *id, &self.connection_pool).await?;

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for UniversityRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM university_details WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UniversityType;
    use sqlx::MySqlPool;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("catalog")))]
    async fn test_list_filters_by_type_and_search(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = UniversityRepository::new(pool);

        let page = repo
            .list(&UniversityListQuery {
                university_type: Some(UniversityType::Private),
                ..Default::default()
            })
            .await?;
        assert!(page.items.iter().all(|u| u.university_type == UniversityType::Private));

        let page = repo
            .list(&UniversityListQuery {
                search: Some("toronto".to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(page.pagination.total_items, 1);
        assert_eq!(page.items[0].slug, "university-of-toronto");
        assert_eq!(page.items[0].country_name.as_deref(), Some("Canada"));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("catalog")))]
    async fn test_slug_taken_ignores_own_row(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = UniversityRepository::new(pool);
        let uni = repo.find_by_slug("university-of-toronto").await?.unwrap();

        assert!(repo.slug_taken("university-of-toronto", None).await?);
        assert!(!repo.slug_taken("university-of-toronto", Some(uni.id)).await?);
        Ok(())
    }
}
