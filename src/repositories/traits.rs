//! Trait CRUD condivisi dai repository del portale
//!
//! Ogni repository implementa solo le operazioni che espone; le query
//! specifiche (slug, filtri, transazioni) restano metodi inerenti.

/// INSERT di una nuova riga; restituisce la riga riletta con l'id assegnato
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Lettura per chiave primaria; `Ok(None)` se la riga non esiste
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Update parziale: vengono scritti solo i campi `Some` del DTO.
///
/// Restituisce `sqlx::Error::RowNotFound` se la riga è sparita nel frattempo,
/// che `AppError` traduce in 404.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// DELETE per chiave primaria; `Ok(false)` se nessuna riga è stata rimossa
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
