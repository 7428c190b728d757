//! Image ledger - registro append-only delle immagini caricate, salvato come array JSON
//!
//! Le scritture sono serializzate da un mutex e avvengono su file temporaneo + rename,
//! così il file su disco è sempre un JSON completo.

use crate::core::{Page, PageParams, Pagination};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub key: String,
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_by: i32,
    pub uploaded_at: DateTime<Utc>,
}

pub struct ImageLedger {
    path: PathBuf,
    entries: Mutex<Vec<ImageRecord>>,
}

impl ImageLedger {
    /// Apre il registro; un file mancante equivale a un registro vuoto
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(|b| b.is_ascii_whitespace()) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Image ledger loaded with {} entries", entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(skip(self, record), fields(key = %record.key))]
    pub async fn append(&self, record: ImageRecord) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().await;
        entries.push(record);
        if let Err(e) = self.persist(&entries).await {
            // il file non è cambiato: la memoria deve restare allineata
            entries.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Tutte le voci, dalla più recente
    pub async fn list(&self) -> Vec<ImageRecord> {
        let entries = self.entries.lock().await;
        entries.iter().rev().cloned().collect()
    }

    /// Una pagina del registro, dal più recente
    pub async fn page(&self, params: PageParams) -> Page<ImageRecord> {
        let entries = self.entries.lock().await;
        let items = entries
            .iter()
            .rev()
            .skip(params.offset() as usize)
            .take(params.limit as usize)
            .cloned()
            .collect();
        Page {
            items,
            pagination: Pagination::new(params, entries.len() as i64),
        }
    }

    async fn persist(&self, entries: &[ImageRecord]) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
