//! Google OAuth token endpoint client.
//!
//! Only the refresh grant is implemented; the authorization-code flow that
//! seeds the credential cache is an external concern.

use chrono::{Duration, Utc};
use log::*;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::Tokens;
use crate::error::{oauth_error, Error, OAuthErrorKind};

/// Request to refresh an access token.
#[derive(Debug, Serialize)]
struct TokenRefreshRequest {
    refresh_token: String,
    client_id: String,
    client_secret: String,
    grant_type: String,
}

/// OAuth token response from Google.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

/// Client for Google's OAuth token endpoint.
pub struct GoogleTokenClient {
    client: reqwest::Client,
    token_url: String,
}

impl GoogleTokenClient {
    /// Create a new token client against the given endpoint URL.
    pub fn new(token_url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            token_url: token_url.to_string(),
        })
    }

    /// Refresh an expired access token using the stored refresh token.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Tokens, Error> {
        let request = TokenRefreshRequest {
            refresh_token: refresh_token.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            grant_type: "refresh_token".to_string(),
        };

        debug!("Refreshing Google access token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to call Google token endpoint: {:?}", e);
                oauth_error(OAuthErrorKind::Network, &e.to_string())
            })?;

        if response.status().is_success() {
            let token_response: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Google token response: {:?}", e);
                oauth_error(
                    OAuthErrorKind::InvalidResponse,
                    "Invalid response from Google OAuth",
                )
            })?;
            info!("Successfully refreshed Google access token");

            Ok(Tokens {
                access_token: SecretString::from(token_response.access_token),
                refresh_token: None,
                expires_at: Some(Utc::now() + Duration::seconds(token_response.expires_in)),
                token_type: token_response.token_type,
                scopes: token_response
                    .scope
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google OAuth error: {}", error_text);
            Err(oauth_error(OAuthErrorKind::TokenRefreshFailed, &error_text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[tokio::test]
    async fn test_refresh_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .match_header(
                "content-type",
                mockito::Matcher::Regex("application/x-www-form-urlencoded".to_string()),
            )
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "access_token": "ya29.fresh",
                    "expires_in": 3599,
                    "token_type": "Bearer",
                    "scope": "https://www.googleapis.com/auth/calendar"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GoogleTokenClient::new(&format!("{}/token", server.url())).unwrap();
        let tokens = client
            .refresh("1//refresh", "client-id", "client-secret")
            .await
            .unwrap();

        assert_eq!(tokens.access_token.expose_secret(), "ya29.fresh");
        assert!(!tokens.is_expired());
        assert_eq!(
            tokens.scopes,
            vec!["https://www.googleapis.com/auth/calendar".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_surfaces_error_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let client = GoogleTokenClient::new(&format!("{}/token", server.url())).unwrap();
        let err = client
            .refresh("1//stale", "client-id", "client-secret")
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            crate::ErrorKind::OAuth(OAuthErrorKind::TokenRefreshFailed)
        );
    }
}
