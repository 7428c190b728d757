//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SU SQLX ************************* //

/*
   Le query sono scritte con `sqlx::query_as::<_, T>` e `QueryBuilder`, controllate a runtime:
   le macro `query!`/`query_as!` richiederebbero un database raggiungibile in compilazione
   e quasi tutte le liste hanno filtri dinamici.

   Regole:
   - ogni valore del client passa da `.bind()` / `push_bind()`, mai da `format!`
   - `format!` solo per comporre costanti SQL scritte qui (SELECT + WHERE fissi)
   - le liste paginate passano da `core::ListQuery` (COUNT + LIMIT/OFFSET con lo stesso filtro)
   - gli UPDATE parziali passano da `core::UpdateBuilder`
   - le operazioni `*_tx` ricevono la connessione della transazione aperta dal service
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod blog;
pub mod country;
pub mod course;
pub mod geo;
pub mod job;
pub mod lead;
pub mod notification;
pub mod resume;
pub mod subject;
pub mod traits;
pub mod university;
pub mod user;
pub mod visa;
pub mod wishlist;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use blog::{BlogCategoryRepository, BlogRepository, CommentRepository};
pub use country::CountryRepository;
pub use course::CourseRepository;
pub use geo::GeoRepository;
pub use job::JobRepository;
pub use lead::{FreeConsultationRepository, LeadRepository};
pub use notification::NotificationRepository;
pub use resume::{NewResume, ResumeRepository};
pub use subject::SubjectRepository;
pub use university::UniversityRepository;
pub use user::UserRepository;
pub use visa::{VisaCountryRepository, VisaRequirementRepository, VisaTypeRepository};
pub use wishlist::WishlistRepository;
