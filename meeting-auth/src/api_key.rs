//! API key authentication trait and bearer implementation.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Known API key providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyProvider {
    Groq,
}

impl ApiKeyProvider {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyProvider::Groq => "groq",
        }
    }
}

/// Trait for authenticating HTTP requests with API keys or bearer tokens.
///
/// Implementations handle provider-specific authentication patterns; Groq
/// uses a standard `Authorization: Bearer xxx` header.
pub trait ProviderAuth: Send + Sync {
    /// Get the provider identifier.
    fn provider(&self) -> ApiKeyProvider;

    /// Apply authentication to a request builder.
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Standard bearer-token authentication.
pub struct BearerAuth {
    provider: ApiKeyProvider,
    api_key: SecretString,
}

impl BearerAuth {
    /// Create a new bearer-token authenticator.
    pub fn new(provider: ApiKeyProvider, api_key: SecretString) -> Self {
        Self { provider, api_key }
    }

    /// Get a reference to the API key.
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}

impl ProviderAuth for BearerAuth {
    fn provider(&self) -> ApiKeyProvider {
        self.provider
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.api_key.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        assert_eq!(ApiKeyProvider::Groq.as_str(), "groq");
    }

    #[test]
    fn test_bearer_auth_applies_header() {
        let auth = BearerAuth::new(
            ApiKeyProvider::Groq,
            SecretString::from("gsk_test".to_string()),
        );
        let client = reqwest::Client::new();
        let request = auth
            .authenticate(client.get("http://localhost/models"))
            .build()
            .unwrap();

        let header = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer gsk_test");
    }
}
