//! Visa repositories - Paesi, tipologie di visto e requisiti

use super::{Create, Delete, Read, Update};
use crate::core::slug::slug_or_from;
use crate::core::{ListQuery, Page, PageParams, SqlFilter, UpdateBuilder};
use crate::dtos::{
    CreateVisaCountryDTO, CreateVisaRequirementDTO, CreateVisaTypeDTO, UpdateVisaCountryDTO,
    UpdateVisaRequirementDTO, UpdateVisaTypeDTO, VisaRequirementListQuery, VisaTypeListQuery,
};
use crate::entities::{VisaCountry, VisaRequirement, VisaType};
use sqlx::{Error, MySql, MySqlPool, QueryBuilder};

const COUNTRY_SELECT: &str =
    "SELECT id, name, slug, flag_image, description, created_at FROM visa_countries";
const TYPE_SELECT: &str = "SELECT id, visa_country_id, name, processing_time, fee, description, created_at \
     FROM visa_types";
const REQUIREMENT_SELECT: &str =
    "SELECT id, visa_type_id, title, description, is_mandatory, created_at FROM visa_requirements";

// ************************* PAESI ************************* //

pub struct VisaCountryRepository {
    connection_pool: MySqlPool,
}

impl VisaCountryRepository {
    pub fn new(connection_pool: MySqlPool) -> VisaCountryRepository {
        Self { connection_pool }
    }

    pub async fn list(&self, search: Option<&str>, params: PageParams) -> Result<Page<VisaCountry>, Error> {
        ListQuery::new(COUNTRY_SELECT, "SELECT COUNT(*) FROM visa_countries")
            .filter(SqlFilter::new().search(&["name"], search))
            .order_by("name ASC")
            .fetch_page(&self.connection_pool, params)
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<VisaCountry>, Error> {
        sqlx::query_as::<_, VisaCountry>(&format!("{} WHERE slug = ?", COUNTRY_SELECT))
            .bind(slug)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Create<VisaCountry, CreateVisaCountryDTO> for VisaCountryRepository {
    async fn create(&self, data: &CreateVisaCountryDTO) -> Result<VisaCountry, Error> {
        let result = sqlx::query(
            "INSERT INTO visa_countries (name, slug, flag_image, description) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(slug_or_from(data.slug.as_deref(), &data.name))
        .bind(&data.flag_image)
        .bind(&data.description)
        .execute(&self.connection_pool)
        .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<VisaCountry, i32> for VisaCountryRepository {
    async fn read(&self, id: &i32) -> Result<Option<VisaCountry>, Error> {
        sqlx::query_as::<_, VisaCountry>(&format!("{} WHERE id = ?", COUNTRY_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<VisaCountry, UpdateVisaCountryDTO, i32> for VisaCountryRepository {
    async fn update(&self, id: &i32, data: &UpdateVisaCountryDTO) -> Result<VisaCountry, Error> {
        let mut update = UpdateBuilder::new("visa_countries");
        update
            .set("name", data.name.clone())
            .set("slug", data.slug.clone())
            .set("flag_image", data.flag_image.clone())
            .set("description", data.description.clone());
        update.execute("id", *id, &self.connection_pool).await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for VisaCountryRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM visa_countries WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ************************* TIPOLOGIE ************************* //

pub struct VisaTypeRepository {
    connection_pool: MySqlPool,
}

impl VisaTypeRepository {
    pub fn new(connection_pool: MySqlPool) -> VisaTypeRepository {
        Self { connection_pool }
    }

    pub async fn list(&self, query: &VisaTypeListQuery) -> Result<Page<VisaType>, Error> {
        let filter = SqlFilter::new()
            .eq_opt("visa_country_id", query.visa_country_id)
            .search(&["name"], query.search.as_deref());
        ListQuery::new(TYPE_SELECT, "SELECT COUNT(*) FROM visa_types")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    pub async fn list_by_country(&self, visa_country_id: i32) -> Result<Vec<VisaType>, Error> {
        sqlx::query_as::<_, VisaType>(&format!(
            "{} WHERE visa_country_id = ? ORDER BY name ASC",
            TYPE_SELECT
        ))
        .bind(visa_country_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<VisaType, CreateVisaTypeDTO> for VisaTypeRepository {
    async fn create(&self, data: &CreateVisaTypeDTO) -> Result<VisaType, Error> {
        let result = sqlx::query(
            "INSERT INTO visa_types (visa_country_id, name, processing_time, fee, description) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(data.visa_country_id)
        .bind(&data.name)
        .bind(&data.processing_time)
        .bind(data.fee)
        .bind(&data.description)
        .execute(&self.connection_pool)
        .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<VisaType, i32> for VisaTypeRepository {
    async fn read(&self, id: &i32) -> Result<Option<VisaType>, Error> {
        sqlx::query_as::<_, VisaType>(&format!("{} WHERE id = ?", TYPE_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<VisaType, UpdateVisaTypeDTO, i32> for VisaTypeRepository {
    async fn update(&self, id: &i32, data: &UpdateVisaTypeDTO) -> Result<VisaType, Error> {
        let mut update = UpdateBuilder::new("visa_types");
        update
            .set("visa_country_id", data.visa_country_id)
            .set("name", data.name.clone())
            .set("processing_time", data.processing_time.clone())
            .set("fee", data.fee)
            .set("description", data.description.clone());
        update.execute("id", *id, &self.connection_pool).await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for VisaTypeRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM visa_types WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ************************* REQUISITI ************************* //

pub struct VisaRequirementRepository {
    connection_pool: MySqlPool,
}

impl VisaRequirementRepository {
    pub fn new(connection_pool: MySqlPool) -> VisaRequirementRepository {
        Self { connection_pool }
    }

    pub async fn list(&self, query: &VisaRequirementListQuery) -> Result<Page<VisaRequirement>, Error> {
        let filter = SqlFilter::new()
            .eq_opt("visa_type_id", query.visa_type_id)
            .search(&["title"], query.search.as_deref());
        ListQuery::new(REQUIREMENT_SELECT, "SELECT COUNT(*) FROM visa_requirements")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    /// Requisiti di più tipologie in una sola query (obbligatori prima)
    pub async fn list_by_types(&self, visa_type_ids: &[i32]) -> Result<Vec<VisaRequirement>, Error> {
        if visa_type_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(REQUIREMENT_SELECT);
        qb.push(" WHERE visa_type_id IN (");
        let mut separated = qb.separated(", ");
        for id in visa_type_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY is_mandatory DESC, id ASC");
        qb.build_query_as::<VisaRequirement>()
            .fetch_all(&self.connection_pool)
            .await
    }
}

impl Create<VisaRequirement, CreateVisaRequirementDTO> for VisaRequirementRepository {
    async fn create(&self, data: &CreateVisaRequirementDTO) -> Result<VisaRequirement, Error> {
        let result = sqlx::query(
            "INSERT INTO visa_requirements (visa_type_id, title, description, is_mandatory) VALUES (?, ?, ?, ?)",
        )
        .bind(data.visa_type_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.is_mandatory)
        .execute(&self.connection_pool)
        .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<VisaRequirement, i32> for VisaRequirementRepository {
    async fn read(&self, id: &i32) -> Result<Option<VisaRequirement>, Error> {
        sqlx::query_as::<_, VisaRequirement>(&format!("{} WHERE id = ?", REQUIREMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<VisaRequirement, UpdateVisaRequirementDTO, i32> for VisaRequirementRepository {
    async fn update(&self, id: &i32, data: &UpdateVisaRequirementDTO) -> Result<VisaRequirement, Error> {
        let mut update = UpdateBuilder::new("visa_requirements");
        update
            .set("visa_type_id", data.visa_type_id)
            .set("title", data.title.clone())
            .set("description", data.description.clone())
            .set("is_mandatory", data.is_mandatory);
        update.execute("id", *id, &self.connection_pool).await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for VisaRequirementRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM visa_requirements WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
