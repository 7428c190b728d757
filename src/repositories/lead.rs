//! Lead repositories - Consulenze gratuite (`free_consulations`) e lead generici (`leads`)

use super::{Delete, Read};
use crate::core::{ListQuery, Page, SqlFilter};
use crate::dtos::{CreateFreeConsultationDTO, CreateLeadDTO, LeadListQuery};
use crate::entities::{FreeConsultation, Lead, LeadKind, LeadStatus};
use sqlx::{Error, MySqlConnection, MySqlPool};
use tracing::instrument;

const CONSULTATION_SELECT: &str = "SELECT id, user_id, full_name, email, phone, preferred_country, \
     study_level, message, status, created_at FROM free_consulations";
const LEAD_SELECT: &str = "SELECT id, kind, full_name, email, phone, subject, message, destination, \
     travel_date, offer_code, preferred_time, rating, status, created_at FROM leads";

// ************************* CONSULENZE GRATUITE ************************* //

pub struct FreeConsultationRepository {
    connection_pool: MySqlPool,
}

impl FreeConsultationRepository {
    pub fn new(connection_pool: MySqlPool) -> FreeConsultationRepository {
        Self { connection_pool }
    }

    /// INSERT dentro la transazione del service; il commit dipende dal CRM
    #[instrument(skip(self, conn, data), fields(email = %data.email))]
    pub async fn insert_tx(
        &self,
        conn: &mut MySqlConnection,
        user_id: Option<i32>,
        data: &CreateFreeConsultationDTO,
    ) -> Result<FreeConsultation, Error> {
        let result = sqlx::query(
            "INSERT INTO free_consulations \
             (user_id, full_name, email, phone, preferred_country, study_level, message, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.preferred_country)
        .bind(&data.study_level)
        .bind(&data.message)
        .bind(LeadStatus::New.as_str())
        .execute(&mut *conn)
        .await?;

        sqlx::query_as::<_, FreeConsultation>(&format!("{} WHERE id = ?", CONSULTATION_SELECT))
            .bind(result.last_insert_id() as i32)
            .fetch_one(&mut *conn)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &LeadListQuery) -> Result<Page<FreeConsultation>, Error> {
        let filter = SqlFilter::new()
            .eq_opt("status", query.status.map(|s| s.as_str()))
            .search(&["full_name", "email", "phone"], query.search.as_deref());
        ListQuery::new(CONSULTATION_SELECT, "SELECT COUNT(*) FROM free_consulations")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    pub async fn update_status(&self, id: i32, status: LeadStatus) -> Result<Option<FreeConsultation>, Error> {
        sqlx::query("UPDATE free_consulations SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        self.read(&id).await
    }
}

impl Read<FreeConsultation, i32> for FreeConsultationRepository {
    async fn read(&self, id: &i32) -> Result<Option<FreeConsultation>, Error> {
        sqlx::query_as::<_, FreeConsultation>(&format!("{} WHERE id = ?", CONSULTATION_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<i32> for FreeConsultationRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM free_consulations WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ************************* LEAD GENERICI ************************* //

/// Tutte le operazioni sono vincolate al `kind`: un id di un altro tipo non esiste
pub struct LeadRepository {
    connection_pool: MySqlPool,
}

impl LeadRepository {
    pub fn new(connection_pool: MySqlPool) -> LeadRepository {
        Self { connection_pool }
    }

    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn create(&self, kind: LeadKind, data: &CreateLeadDTO) -> Result<Lead, Error> {
        let result = sqlx::query(
            "INSERT INTO leads \
             (kind, full_name, email, phone, subject, message, destination, travel_date, offer_code, preferred_time, rating, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(kind.as_str())
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.subject)
        .bind(&data.message)
        .bind(&data.destination)
        .bind(data.travel_date)
        .bind(&data.offer_code)
        .bind(&data.preferred_time)
        .bind(data.rating)
        .bind(LeadStatus::New.as_str())
        .execute(&self.connection_pool)
        .await?;

        let id = result.last_insert_id() as i32;
        self.find(kind, id).await?.ok_or(Error::RowNotFound)
    }

    pub async fn find(&self, kind: LeadKind, id: i32) -> Result<Option<Lead>, Error> {
        sqlx::query_as::<_, Lead>(&format!("{} WHERE id = ? AND kind = ?", LEAD_SELECT))
            .bind(id)
            .bind(kind.as_str())
            .fetch_optional(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, kind: LeadKind, query: &LeadListQuery) -> Result<Page<Lead>, Error> {
        let filter = SqlFilter::new()
            .eq("kind", kind.as_str())
            .eq_opt("status", query.status.map(|s| s.as_str()))
            .search(&["full_name", "email", "subject"], query.search.as_deref());
        ListQuery::new(LEAD_SELECT, "SELECT COUNT(*) FROM leads")
            .filter(filter)
            .order_by("created_at DESC, id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    pub async fn update_status(
        &self,
        kind: LeadKind,
        id: i32,
        status: LeadStatus,
    ) -> Result<Option<Lead>, Error> {
        sqlx::query("UPDATE leads SET status = ? WHERE id = ? AND kind = ?")
            .bind(status.as_str())
            .bind(id)
            .bind(kind.as_str())
            .execute(&self.connection_pool)
            .await?;
        self.find(kind, id).await
    }

    pub async fn delete(&self, kind: LeadKind, id: i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ? AND kind = ?")
            .bind(id)
            .bind(kind.as_str())
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::MySqlPool;

    fn complaint() -> CreateLeadDTO {
        CreateLeadDTO {
            full_name: "Omar Haddad".to_string(),
            email: "omar@example.com".to_string(),
            subject: Some("Late reply".to_string()),
            message: Some("Nobody called me back".to_string()),
            ..Default::default()
        }
    }

    #[sqlx::test]
    async fn test_lead_operations_are_scoped_by_kind(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = LeadRepository::new(pool);
        let lead = repo.create(LeadKind::Complaint, &complaint()).await?;
        assert_eq!(lead.status, LeadStatus::New);

        assert!(repo.find(LeadKind::Feedback, lead.id).await?.is_none());
        assert!(!repo.delete(LeadKind::Feedback, lead.id).await?);

        let updated = repo
            .update_status(LeadKind::Complaint, lead.id, LeadStatus::Contacted)
            .await?
            .unwrap();
        assert_eq!(updated.status, LeadStatus::Contacted);
        assert!(repo.delete(LeadKind::Complaint, lead.id).await?);
        Ok(())
    }

    #[sqlx::test]
    async fn test_list_filters_by_kind(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = LeadRepository::new(pool);
        repo.create(LeadKind::Complaint, &complaint()).await?;
        repo.create(
            LeadKind::Feedback,
            &CreateLeadDTO {
                rating: Some(5),
                ..complaint()
            },
        )
        .await?;

        let page = repo.list(LeadKind::Feedback, &LeadListQuery::default()).await?;
        assert_eq!(page.pagination.total_items, 1);
        assert_eq!(page.items[0].rating, Some(5));
        Ok(())
    }
}
