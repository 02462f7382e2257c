//! OAuth credential management: persisted cache plus refresh.

pub mod cache;
pub mod google;
pub mod tokens;

pub use cache::{FileTokenCache, StoredCredential};
pub use google::GoogleTokenClient;
pub use tokens::Tokens;

use log::*;
use secrecy::SecretString;
use std::path::PathBuf;

use crate::error::{oauth_error, Error, OAuthErrorKind};

/// Produces a valid access token from the persisted credential cache,
/// refreshing it against the token endpoint when expired.
///
/// Contract for callers: returns a usable credential or fails with an
/// authentication error. Running the interactive consent flow to seed the
/// cache is outside this crate.
pub struct CredentialManager {
    cache: FileTokenCache,
    token_client: GoogleTokenClient,
}

impl CredentialManager {
    pub fn new(cache_path: impl Into<PathBuf>, token_url: &str) -> Result<Self, Error> {
        Ok(Self {
            cache: FileTokenCache::new(cache_path),
            token_client: GoogleTokenClient::new(token_url)?,
        })
    }

    /// Return a non-expired access token, refreshing and re-persisting the
    /// cache when needed.
    pub async fn access_token(&self) -> Result<SecretString, Error> {
        let credential = self.cache.load()?.ok_or_else(|| {
            error!(
                "No credential cache found at {}; run the authorization flow first",
                self.cache.path().display()
            );
            oauth_error(OAuthErrorKind::NotAuthorized, "credential cache not found")
        })?;

        let tokens = credential.to_tokens();
        if !tokens.is_expired() {
            return Ok(tokens.access_token);
        }

        let refresh_token = credential.refresh_token.as_deref().ok_or_else(|| {
            error!("Cached credential is expired and has no refresh token");
            oauth_error(
                OAuthErrorKind::NotAuthorized,
                "expired credential without refresh token",
            )
        })?;

        info!("Cached access token expired; refreshing");
        let refreshed = self
            .token_client
            .refresh(
                refresh_token,
                &credential.client_id,
                &credential.client_secret,
            )
            .await?;

        // Persist for the next run. A write failure is not fatal here; the
        // refreshed token is still valid for this invocation.
        if let Err(e) = self.cache.store(&credential.with_refreshed(&refreshed)) {
            warn!("Failed to persist refreshed credential: {}", e);
        }

        Ok(refreshed.access_token)
    }
}
