//! Groq API client for transcription and chat completion.
//!
//! This module provides an HTTP client for Groq's OpenAI-compatible API,
//! covering the two endpoints the pipeline consumes: audio transcription
//! (Whisper) and chat completions (used for meeting-info extraction).

use async_trait::async_trait;
use log::*;
use meeting_ai::traits::{completion, transcription};
use meeting_ai::Error;
use meeting_auth::api_key::{ApiKeyProvider, BearerAuth, ProviderAuth};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Response from the audio transcription endpoint.
///
/// `verbose_json` carries segments, language, and duration as well, but
/// only the transcript text is consumed.
#[derive(Debug, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Request body for a chat completion.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completion endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: String,
}

/// Groq API client
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    auth: BearerAuth,
    transcription_model: String,
    completion_model: String,
}

impl GroqClient {
    /// Create a new Groq client with the given API key and base URL.
    pub fn new(
        api_key: SecretString,
        base_url: &str,
        transcription_model: &str,
        completion_model: &str,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: BearerAuth::new(ApiKeyProvider::Groq, api_key),
            transcription_model: transcription_model.to_string(),
            completion_model: completion_model.to_string(),
        })
    }

    /// Upload one audio file for transcription.
    pub async fn create_transcription(
        &self,
        audio_path: &Path,
    ) -> Result<TranscriptionResponse, Error> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| Error::Configuration(format!("failed to read audio file: {e}")))?;

        debug!(
            "Uploading {} ({} bytes) for transcription",
            file_name,
            bytes.len()
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("model", self.transcription_model.clone())
            .text("response_format", "verbose_json");

        let request = self.auth.authenticate(self.client.post(&url)).multipart(form);
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::read_json(response, "transcription").await
    }

    /// Run a chat completion with a system+user message pair.
    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &completion::Params,
    ) -> Result<ChatCompletionResponse, Error> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: &self.completion_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stream: false,
        };

        debug!("Requesting chat completion from {}", self.completion_model);

        let request = self.auth.authenticate(self.client.post(&url)).json(&body);
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::read_json(response, "chat completion").await
    }

    /// Map a response to parsed JSON or the appropriate error variant.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, Error> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                warn!("Failed to parse Groq {} response: {:?}", operation, e);
                Error::Deserialization(format!("invalid {operation} response: {e}"))
            });
        }

        let error_text = response.text().await.unwrap_or_default();
        error!("Groq {} API error ({}): {}", operation, status, error_text);

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Err(Error::Authentication(error_text))
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(Error::RateLimited {
                retry_after_seconds: 0,
            })
        } else if status.is_server_error() {
            Err(Error::Provider(format!("{status}: {error_text}")))
        } else {
            Err(Error::Configuration(format!("{status}: {error_text}")))
        }
    }
}

#[async_trait]
impl transcription::Provider for GroqClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, Error> {
        let response = self.create_transcription(audio_path).await?;
        Ok(response.text)
    }

    fn provider_id(&self) -> &str {
        "groq"
    }
}

#[async_trait]
impl completion::Provider for GroqClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &completion::Params,
    ) -> Result<String, Error> {
        let response = self
            .chat_completion(system_prompt, user_prompt, params)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                Error::Deserialization("chat completion returned no choices".to_string())
            })
    }

    fn provider_id(&self) -> &str {
        "groq"
    }
}
