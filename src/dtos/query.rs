//! Query DTOs - parametri comuni delle liste

use crate::core::PageParams;
use serde::Deserialize;

/// `?page=&limit=&search=` per le liste senza filtri specifici
#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// `?q=&limit=` per la ricerca aggregata
#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}
