//! Geo entities - Tabelle di riferimento paesi/stati/città (`countries_db`, `states_db`, `cities_db`)

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct GeoCountry {
    pub id: i32,
    pub name: String,
    pub iso2: Option<String>,
    pub phone_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct GeoState {
    pub id: i32,
    pub country_id: i32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct GeoCity {
    pub id: i32,
    pub state_id: i32,
    pub name: String,
}
