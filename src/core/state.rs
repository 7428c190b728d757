//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, le configurazioni e i client esterni
//! necessari per gestire le richieste.

use crate::core::Config;
use crate::external::{
    CrmClient, HttpCrmClient, ImageLedger, LedgerError, LocalStorage, NoopCrmClient,
    ObjectStorage, S3Storage,
};
use crate::repositories::{
    BlogCategoryRepository, BlogRepository, CommentRepository, CountryRepository,
    CourseRepository, FreeConsultationRepository, GeoRepository, JobRepository, LeadRepository,
    NotificationRepository, ResumeRepository, SubjectRepository, UniversityRepository,
    UserRepository, VisaCountryRepository, VisaRequirementRepository, VisaTypeRepository,
    WishlistRepository,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::warn;

/// Impostazioni di autenticazione condivise da login e middleware
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub cookie_secure: bool,
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_ttl_hours: 24,
            cookie_secure: false,
        }
    }
}

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Pool condiviso, usato direttamente per aprire le transazioni
    pub pool: MySqlPool,

    pub user: UserRepository,
    pub university: UniversityRepository,
    pub subject: SubjectRepository,
    pub course: CourseRepository,
    pub country: CountryRepository,
    pub geo: GeoRepository,
    pub blog: BlogRepository,
    pub blog_category: BlogCategoryRepository,
    pub comment: CommentRepository,
    pub job: JobRepository,
    pub visa_country: VisaCountryRepository,
    pub visa_type: VisaTypeRepository,
    pub visa_requirement: VisaRequirementRepository,
    pub free_consultation: FreeConsultationRepository,
    pub lead: LeadRepository,
    pub wishlist: WishlistRepository,
    pub notification: NotificationRepository,
    pub resume: ResumeRepository,

    /// Secret key per JWT token
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub cookie_secure: bool,

    /// Storage degli upload (S3 in produzione, filesystem in sviluppo e test)
    pub storage: Arc<dyn ObjectStorage>,

    /// Client del CRM a cui vengono inoltrati i lead
    pub crm: Arc<dyn CrmClient>,

    /// Registro delle immagini caricate dall'area admin
    pub images: ImageLedger,

    pub max_upload_bytes: usize,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito.
    pub fn new(
        pool: MySqlPool,
        auth: AuthSettings,
        storage: Arc<dyn ObjectStorage>,
        crm: Arc<dyn CrmClient>,
        images: ImageLedger,
    ) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            university: UniversityRepository::new(pool.clone()),
            subject: SubjectRepository::new(pool.clone()),
            course: CourseRepository::new(pool.clone()),
            country: CountryRepository::new(pool.clone()),
            geo: GeoRepository::new(pool.clone()),
            blog: BlogRepository::new(pool.clone()),
            blog_category: BlogCategoryRepository::new(pool.clone()),
            comment: CommentRepository::new(pool.clone()),
            job: JobRepository::new(pool.clone()),
            visa_country: VisaCountryRepository::new(pool.clone()),
            visa_type: VisaTypeRepository::new(pool.clone()),
            visa_requirement: VisaRequirementRepository::new(pool.clone()),
            free_consultation: FreeConsultationRepository::new(pool.clone()),
            lead: LeadRepository::new(pool.clone()),
            wishlist: WishlistRepository::new(pool.clone()),
            notification: NotificationRepository::new(pool.clone()),
            resume: ResumeRepository::new(pool.clone()),
            pool,
            jwt_secret: auth.jwt_secret,
            jwt_ttl_hours: auth.jwt_ttl_hours,
            cookie_secure: auth.cookie_secure,
            storage,
            crm,
            images,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    /// Costruisce lo stato a partire dalla configurazione: S3 se è presente un bucket,
    /// CRM HTTP se è presente un URL
    pub async fn from_config(pool: MySqlPool, config: &Config) -> Result<Self, LedgerError> {
        let storage: Arc<dyn ObjectStorage> = match &config.storage.s3_bucket {
            Some(bucket) => Arc::new(S3Storage::new(&config.storage, bucket.clone()).await),
            None => Arc::new(LocalStorage::new(
                config.storage.local_dir.clone(),
                config
                    .storage
                    .public_url
                    .clone()
                    .unwrap_or_else(|| "/uploads".to_string()),
            )),
        };

        let crm: Arc<dyn CrmClient> = match &config.crm.url {
            Some(url) => match HttpCrmClient::new(url.clone(), config.crm.api_key.clone()) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    warn!("CRM client could not be built ({}), forwarding disabled", e);
                    Arc::new(NoopCrmClient)
                }
            },
            None => Arc::new(NoopCrmClient),
        };

        let images = ImageLedger::open(&config.image_ledger_path).await?;

        let auth = AuthSettings {
            jwt_secret: config.jwt_secret.clone(),
            jwt_ttl_hours: config.jwt_ttl_hours,
            cookie_secure: config.cookie_secure,
        };

        let mut state = Self::new(pool, auth, storage, crm, images);
        state.max_upload_bytes = config.storage.max_upload_bytes;
        Ok(state)
    }
}
