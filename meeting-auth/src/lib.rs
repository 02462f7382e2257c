//! # meeting-auth
//!
//! Single source of truth for ALL authentication in the meeting scheduler:
//! - API key authentication for AI service providers (Groq)
//! - Google OAuth token cache persisted between runs (`token.json`)
//! - Access-token refresh against the Google token endpoint
//!
//! The interactive consent flow is out of scope: this crate either produces
//! a valid credential from the persisted cache (refreshing it when expired)
//! or fails with an authentication error.

pub mod api_key;
pub mod error;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use oauth::CredentialManager;
