//! Wishlist entity - Corsi salvati da uno studente

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct WishlistItem {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub course_title: String,
    pub course_slug: String,
    pub university_name: String,
    pub created_at: DateTime<Utc>,
}
