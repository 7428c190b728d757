//! CountryRepository - Destinazioni di studio (tabella `countries`)

use super::{Create, Delete, Read, Update};
use crate::core::slug::slug_or_from;
use crate::core::{ListQuery, Page, PageParams, SqlFilter, UpdateBuilder};
use crate::dtos::{CreateCountryDTO, UpdateCountryDTO};
use crate::entities::Country;
use sqlx::{Error, MySqlPool};

const COUNTRY_SELECT: &str = "SELECT id, name, slug, description, image, created_at FROM countries";

pub struct CountryRepository {
    connection_pool: MySqlPool,
}

impl CountryRepository {
    pub fn new(connection_pool: MySqlPool) -> CountryRepository {
        Self { connection_pool }
    }

    pub async fn list(&self, search: Option<&str>, params: PageParams) -> Result<Page<Country>, Error> {
        ListQuery::new(COUNTRY_SELECT, "SELECT COUNT(*) FROM countries")
            .filter(SqlFilter::new().search(&["name"], search))
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, params)
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Country>, Error> {
        sqlx::query_as::<_, Country>(&format!("{} WHERE slug = ?", COUNTRY_SELECT))
            .bind(slug)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Create<Country, CreateCountryDTO> for CountryRepository {
    async fn create(&self, data: &CreateCountryDTO) -> Result<Country, Error> {
        let result =
            sqlx::query("INSERT INTO countries (name, slug, description, image) VALUES (?, ?, ?, ?)")
                .bind(&data.name)
                .bind(slug_or_from(data.slug.as_deref(), &data.name))
                .bind(&data.description)
                .bind(&data.image)
                .execute(&self.connection_pool)
                .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Country, i32> for CountryRepository {
    async fn read(&self, id: &i32) -> Result<Option<Country>, Error> {
        sqlx::query_as::<_, Country>(&format!("{} WHERE id = ?", COUNTRY_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Country, UpdateCountryDTO, i32> for CountryRepository {
    async fn update(&self, id: &i32, data: &UpdateCountryDTO) -> Result<Country, Error> {
        let mut update = UpdateBuilder::new("countries");
        update
            .set("name", data.name.clone())
            .set("slug", data.slug.clone())
            .set("description", data.description.clone())
            .set("image", data.image.clone());
        update.execute("id", *id, &self.connection_pool).await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for CountryRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
