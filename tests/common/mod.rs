#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use axum_test::http::HeaderName;
use sqlx::MySqlPool;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uniportal::core::{AppState, AuthSettings, Claims};
use uniportal::entities::Role;
use uniportal::external::{
    CrmClient, CrmError, CrmLead, ImageLedger, LocalStorage, ObjectStorage, StorageError,
    StoredObject,
};

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Password di tutti gli utenti in `fixtures/users.sql`
pub const FIXTURE_PASSWORD: &str = "Password123";

// id degli utenti in `fixtures/users.sql`
pub const ADMIN_ID: i32 = 1;
pub const STUDENT_ID: i32 = 2;
pub const CONSULTANT_ID: i32 = 3;
pub const OTHER_STUDENT_ID: i32 = 4;

/// CRM finto: accetta o rifiuta a comando e ricorda i lead ricevuti
pub struct ScriptedCrm {
    accept: AtomicBool,
    received: Mutex<Vec<CrmLead>>,
}

impl ScriptedCrm {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept: AtomicBool::new(true),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        let crm = Self::accepting();
        crm.accept.store(false, Ordering::SeqCst);
        crm
    }

    pub fn received(&self) -> Vec<CrmLead> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrmClient for ScriptedCrm {
    async fn forward(&self, lead: &CrmLead) -> Result<(), CrmError> {
        self.received.lock().unwrap().push(lead.clone());
        if self.accept.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CrmError::Rejected(503))
        }
    }
}

/// Storage su filesystem le cui cancellazioni falliscono sempre
pub struct FailingDeleteStorage {
    inner: LocalStorage,
}

impl FailingDeleteStorage {
    pub fn new(root: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalStorage::new(root, "http://cdn.test/uploads"),
        })
    }
}

#[async_trait]
impl ObjectStorage for FailingDeleteStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<StoredObject, StorageError> {
        self.inner.put(key, data, content_type).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        Err(StorageError::Delete {
            key: key.to_string(),
            reason: "bucket unavailable".to_string(),
        })
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }
}

/// Directory temporanea univoca per storage e ledger di un test
pub fn test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("uniportal-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

/// Crea un AppState per i test con storage locale e CRM che accetta tutto
pub async fn create_test_state(pool: MySqlPool) -> Arc<AppState> {
    let dir = test_dir();
    let storage = Arc::new(LocalStorage::new(dir.join("uploads"), "http://cdn.test/uploads"));
    create_test_state_with(pool, storage, ScriptedCrm::accepting(), dir).await
}

/// Come `create_test_state`, con storage e CRM scelti dal test
pub async fn create_test_state_with(
    pool: MySqlPool,
    storage: Arc<dyn ObjectStorage>,
    crm: Arc<dyn CrmClient>,
    dir: PathBuf,
) -> Arc<AppState> {
    let images = ImageLedger::open(dir.join("uploaded_images.json"))
        .await
        .expect("Failed to open image ledger");
    let mut state = AppState::new(pool, AuthSettings::new(TEST_JWT_SECRET), storage, crm, images);
    state.max_upload_bytes = 1024 * 1024;
    Arc::new(state)
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = uniportal::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT valido per 24 ore; il middleware rilegge comunque l'utente dal database
pub fn create_test_jwt(user_id: i32, role: Role) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = Utc::now();
    let claims = Claims {
        exp: (now + Duration::hours(24)).timestamp() as usize,
        iat: now.timestamp() as usize,
        id: user_id,
        name: format!("user-{}", user_id),
        email: format!("user-{}@uniportal.test", user_id),
        role,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

pub fn authorization() -> HeaderName {
    HeaderName::from_static("authorization")
}

pub fn bearer(user_id: i32, role: Role) -> String {
    format!("Bearer {}", create_test_jwt(user_id, role))
}
