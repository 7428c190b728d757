//! Blog entities - Articoli, categorie, commenti e risposte

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct BlogCategory {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Blog {
    pub id: i32,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    // chiave dell'oggetto nello storage, l'URL pubblico viene calcolato nel DTO
    pub image_key: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i32,
    pub blog_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Reply {
    pub id: i32,
    pub comment_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
