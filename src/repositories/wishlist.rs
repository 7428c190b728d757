//! WishlistRepository - Corsi salvati dagli studenti

use crate::entities::WishlistItem;
use sqlx::{Error, MySqlPool};
use tracing::instrument;

const WISHLIST_SELECT: &str = "SELECT w.id, w.user_id, w.course_id, c.title AS course_title, \
     c.slug AS course_slug, u.name AS university_name, w.created_at \
     FROM wishlist w \
     JOIN courses c ON c.id = w.course_id \
     JOIN university_details u ON u.id = c.university_id";

pub struct WishlistRepository {
    connection_pool: MySqlPool,
}

impl WishlistRepository {
    pub fn new(connection_pool: MySqlPool) -> WishlistRepository {
        Self { connection_pool }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<WishlistItem>, Error> {
        sqlx::query_as::<_, WishlistItem>(&format!(
            "{} WHERE w.user_id = ? ORDER BY w.created_at DESC, w.id DESC",
            WISHLIST_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn find(&self, user_id: i32, course_id: i32) -> Result<Option<WishlistItem>, Error> {
        sqlx::query_as::<_, WishlistItem>(&format!(
            "{} WHERE w.user_id = ? AND w.course_id = ?",
            WISHLIST_SELECT
        ))
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Ritorna `(riga, creata)`: se la coppia esiste già non inserisce nulla
    #[instrument(skip(self))]
    pub async fn add(&self, user_id: i32, course_id: i32) -> Result<(WishlistItem, bool), Error> {
        if let Some(existing) = self.find(user_id, course_id).await? {
            return Ok((existing, false));
        }
        // INSERT IGNORE copre la richiesta concorrente che arriva tra find e insert
        let result = sqlx::query("INSERT IGNORE INTO wishlist (user_id, course_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(course_id)
            .execute(&self.connection_pool)
            .await?;
        let item = self
            .find(user_id, course_id)
            .await?
            .ok_or(Error::RowNotFound)?;
        Ok((item, result.rows_affected() > 0))
    }

    pub async fn remove(&self, user_id: i32, course_id: i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM wishlist WHERE user_id = ? AND course_id = ?")
            .bind(user_id)
            .bind(course_id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
