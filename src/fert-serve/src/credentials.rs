//! Admin service-account credential and its once-only initialization

use log::info;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("FIREBASE_SERVICE_ACCOUNT_KEY is not set")]
    Missing,

    #[error("service account key is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("service account key is invalid: {0}")]
    Invalid(&'static str),
}

/// Service account key as downloaded from the cloud console
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,

    pub project_id: Option<String>,

    pub private_key_id: Option<String>,

    pub private_key: String,

    pub client_email: String,

    pub client_id: Option<String>,

    pub token_uri: Option<String>,
}

// Keep the private key out of logs.
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey = serde_json::from_str(raw)?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), CredentialError> {
        if self.key_type != "service_account" {
            return Err(CredentialError::Invalid("type must be 'service_account'"));
        }
        if self.client_email.trim().is_empty() {
            return Err(CredentialError::Invalid("client_email is empty"));
        }
        if !self.private_key.contains("PRIVATE KEY-----") {
            return Err(CredentialError::Invalid(
                "private_key is not a PEM encoded private key",
            ));
        }
        Ok(())
    }
}

/// Holds the admin credential once it has been initialized.
///
/// Concurrent first acquisitions race safely; only one parse result is kept.
/// A failed attempt leaves the guard empty so the next acquisition retries.
#[derive(Default)]
pub struct CredentialGuard {
    cell: OnceCell<ServiceAccountKey>,
}

impl CredentialGuard {
    pub fn new() -> Self {
        CredentialGuard::default()
    }

    pub fn acquire(&self, raw: Option<&str>) -> Result<&ServiceAccountKey, CredentialError> {
        self.cell.get_or_try_init(|| {
            let key = ServiceAccountKey::parse(raw.ok_or(CredentialError::Missing)?)?;
            info!("Admin credential initialized for {}", key.client_email);
            Ok(key)
        })
    }

    pub fn get(&self) -> Option<&ServiceAccountKey> {
        self.cell.get()
    }
}
