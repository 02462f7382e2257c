//! File-backed credential cache compatible with Google's authorized-user format.
//!
//! The cache file (`token.json` by convention) is produced once by an
//! external consent flow and persisted between runs. This module only reads
//! it and rewrites it after a successful refresh.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::Tokens;
use crate::error::{token_error, Error, TokenErrorKind};

/// On-disk shape of the credential cache.
///
/// Field names mirror Google's authorized-user JSON so a `token.json`
/// written by other tooling can be consumed as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredCredential {
    /// View the cached credential as in-memory tokens.
    pub fn to_tokens(&self) -> Tokens {
        Tokens {
            access_token: SecretString::from(self.token.clone()),
            refresh_token: self
                .refresh_token
                .clone()
                .map(SecretString::from),
            expires_at: self.expiry,
            token_type: "Bearer".to_string(),
            scopes: self.scopes.clone(),
        }
    }

    /// Replace the access token and expiry after a successful refresh.
    pub fn with_refreshed(&self, tokens: &Tokens) -> Self {
        Self {
            token: tokens.access_token.expose_secret().to_string(),
            expiry: tokens.expires_at,
            ..self.clone()
        }
    }
}

/// Credential cache persisted as a single JSON file.
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached credential, or `None` when the file does not exist.
    pub fn load(&self) -> Result<Option<StoredCredential>, Error> {
        if !self.path.exists() {
            debug!("No credential cache at {}", self.path.display());
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            warn!("Failed to read credential cache: {:?}", e);
            token_error(TokenErrorKind::Storage, &e.to_string())
        })?;

        let credential: StoredCredential = serde_json::from_str(&raw).map_err(|e| {
            warn!("Failed to parse credential cache: {:?}", e);
            token_error(TokenErrorKind::Storage, &e.to_string())
        })?;

        Ok(Some(credential))
    }

    /// Persist the credential, overwriting any previous file.
    pub fn store(&self, credential: &StoredCredential) -> Result<(), Error> {
        let raw = serde_json::to_string_pretty(credential)
            .map_err(|e| token_error(TokenErrorKind::Storage, &e.to_string()))?;

        fs::write(&self.path, raw).map_err(|e| {
            warn!("Failed to write credential cache: {:?}", e);
            token_error(TokenErrorKind::Storage, &e.to_string())
        })?;

        debug!("Persisted credential cache to {}", self.path.display());
        Ok(())
    }
}
