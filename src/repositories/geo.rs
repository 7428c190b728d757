//! GeoRepository - Tabelle di riferimento in sola lettura

use crate::entities::{GeoCity, GeoCountry, GeoState};
use sqlx::{Error, MySqlPool};

pub struct GeoRepository {
    connection_pool: MySqlPool,
}

impl GeoRepository {
    pub fn new(connection_pool: MySqlPool) -> GeoRepository {
        Self { connection_pool }
    }

    pub async fn countries(&self) -> Result<Vec<GeoCountry>, Error> {
        sqlx::query_as::<_, GeoCountry>(
            "SELECT id, name, iso2, phone_code FROM countries_db ORDER BY name ASC",
        )
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn country_exists(&self, id: i32) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries_db WHERE id = ?")
            .bind(id)
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn states(&self, country_id: i32) -> Result<Vec<GeoState>, Error> {
        sqlx::query_as::<_, GeoState>(
            "SELECT id, country_id, name FROM states_db WHERE country_id = ? ORDER BY name ASC",
        )
        .bind(country_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn state_exists(&self, id: i32) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM states_db WHERE id = ?")
            .bind(id)
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn cities(&self, state_id: i32) -> Result<Vec<GeoCity>, Error> {
        sqlx::query_as::<_, GeoCity>(
            "SELECT id, state_id, name FROM cities_db WHERE state_id = ? ORDER BY name ASC",
        )
        .bind(state_id)
        .fetch_all(&self.connection_pool)
        .await
    }
}
