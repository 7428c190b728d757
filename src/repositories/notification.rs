//! NotificationRepository - Notifiche personali e broadcast

use super::{Create, Delete, Read};
use crate::core::{ListQuery, Page, PageParams, SqlFilter};
use crate::dtos::{CreateNotificationDTO, NotificationListQuery};
use crate::entities::Notification;
use sqlx::{Error, MySqlPool};

const NOTIFICATION_SELECT: &str =
    "SELECT id, user_id, title, message, link, is_read, created_at FROM notifications";
const NOTIFICATION_COUNT: &str = "SELECT COUNT(*) FROM notifications";

pub struct NotificationRepository {
    connection_pool: MySqlPool,
}

impl NotificationRepository {
    pub fn new(connection_pool: MySqlPool) -> NotificationRepository {
        Self { connection_pool }
    }

    /// Lista di amministrazione
    pub async fn list(&self, query: &NotificationListQuery) -> Result<Page<Notification>, Error> {
        let mut filter = SqlFilter::new().eq_opt("user_id", query.user_id);
        if query.unread_only {
            filter = filter.raw("is_read = FALSE");
        }
        ListQuery::new(NOTIFICATION_SELECT, NOTIFICATION_COUNT)
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    /// Notifiche visibili a un utente: le sue più quelle broadcast
    pub async fn list_visible(
        &self,
        user_id: i32,
        unread_only: bool,
        params: PageParams,
    ) -> Result<Page<Notification>, Error> {
        let mut filter = SqlFilter::new().eq_or_null("user_id", user_id);
        if unread_only {
            filter = filter.raw("is_read = FALSE");
        }
        ListQuery::new(NOTIFICATION_SELECT, NOTIFICATION_COUNT)
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, params)
            .await
    }

    pub async fn find_visible(&self, id: i32, user_id: i32) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!(
            "{} WHERE id = ? AND (user_id = ? OR user_id IS NULL)",
            NOTIFICATION_SELECT
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn mark_read(&self, id: i32) -> Result<(), Error> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }
}

impl Create<Notification, CreateNotificationDTO> for NotificationRepository {
    async fn create(&self, data: &CreateNotificationDTO) -> Result<Notification, Error> {
        let result =
            sqlx::query("INSERT INTO notifications (user_id, title, message, link) VALUES (?, ?, ?, ?)")
                .bind(data.user_id)
                .bind(&data.title)
                .bind(&data.message)
                .bind(&data.link)
                .execute(&self.connection_pool)
                .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Notification, i32> for NotificationRepository {
    async fn read(&self, id: &i32) -> Result<Option<Notification>, Error> {
        sqlx::query_as::<_, Notification>(&format!("{} WHERE id = ?", NOTIFICATION_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<i32> for NotificationRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
