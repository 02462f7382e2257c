//! OAuth token types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// OAuth tokens with metadata.
#[derive(Debug, Clone)]
pub struct Tokens {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: Option<SecretString>,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
}

impl Tokens {
    /// Check if the access token is expired or about to expire soon.
    ///
    /// Returns true if token is expired or will expire within 5 minutes.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires| {
                let now = Utc::now();
                let buffer = chrono::Duration::minutes(5);
                expires <= (now + buffer)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tokens_expiring_at(expires_at: Option<DateTime<Utc>>) -> Tokens {
        Tokens {
            access_token: SecretString::from("test".to_string()),
            refresh_token: None,
            expires_at,
            token_type: "Bearer".to_string(),
            scopes: vec![],
        }
    }

    #[test]
    fn test_token_not_expired() {
        let tokens = tokens_expiring_at(Some(Utc::now() + Duration::hours(1)));
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_token_expired() {
        let tokens = tokens_expiring_at(Some(Utc::now() - Duration::hours(1)));
        assert!(tokens.is_expired());
    }

    #[test]
    fn test_token_expiring_soon() {
        let tokens = tokens_expiring_at(Some(Utc::now() + Duration::minutes(3)));
        assert!(tokens.is_expired());
    }

    #[test]
    fn test_token_without_expiry_treated_as_valid() {
        let tokens = tokens_expiring_at(None);
        assert!(!tokens.is_expired());
    }
}
