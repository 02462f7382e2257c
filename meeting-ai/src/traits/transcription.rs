//! Transcription provider trait.

use crate::Error;
use async_trait::async_trait;
use std::path::Path;

/// Abstraction for speech-to-text transcription services.
///
/// Implementations upload one audio segment and return its transcript text
/// in a single blocking call. Only the transcript text is consumed; word
/// timing, confidence, and other provider extras are deliberately not part
/// of this contract.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Transcribe the audio file at `audio_path` and return the transcript text.
    ///
    /// The file is read and uploaded whole; callers are responsible for
    /// keeping segments within the provider's upload limits.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "groq").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;
}
