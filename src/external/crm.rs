//! CRM - inoltro sincrono dei lead al sistema esterno

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("CRM request failed: {0}")]
    Transport(String),

    #[error("CRM rejected the lead with status {0}")]
    Rejected(u16),
}

/// Lead nel formato atteso dal CRM
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CrmLead {
    pub source: &'static str,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub message: Option<String>,
}

#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn forward(&self, lead: &CrmLead) -> Result<(), CrmError>;
}

pub struct HttpCrmClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpCrmClient {
    pub fn new(url: String, api_key: Option<String>) -> Result<Self, CrmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CrmError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

#[async_trait]
impl CrmClient for HttpCrmClient {
    #[instrument(skip(self, lead), fields(source = lead.source))]
    async fn forward(&self, lead: &CrmLead) -> Result<(), CrmError> {
        debug!("Forwarding lead to CRM");
        let mut request = self.client.post(&self.url).json(lead);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CrmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("CRM responded with status {}", status);
            return Err(CrmError::Rejected(status.as_u16()));
        }

        info!("Lead accepted by CRM");
        Ok(())
    }
}

/// CRM disabilitato: accetta sempre
pub struct NoopCrmClient;

#[async_trait]
impl CrmClient for NoopCrmClient {
    async fn forward(&self, lead: &CrmLead) -> Result<(), CrmError> {
        debug!(source = lead.source, "CRM not configured, lead kept locally");
        Ok(())
    }
}
