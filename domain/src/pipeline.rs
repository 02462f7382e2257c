//! End-to-end pipeline: audio file in, calendar outcome out.
//!
//! Wires the stages together in order: chunk the audio, transcribe each
//! segment, assemble the transcript, extract meeting info, and run the
//! scheduling gate. Construction from [`Config`] builds the real Groq and
//! Google Calendar clients; each stage owns its own degradation policy, so
//! the pipeline itself only sequences them.

use log::*;
use meeting_ai::MeetingInfo;
use meeting_auth::oauth::CredentialManager;
use secrecy::SecretString;
use service::config::Config;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::chunker::{AudioSource, Chunker};
use crate::error::{internal_error, Error, InternalErrorKind};
use crate::extraction::MeetingInfoExtractor;
use crate::gateway::{GoogleCalendarClient, GroqClient};
use crate::scheduler::{ScheduleOutcome, SchedulingGate};
use crate::assembler;
use crate::transcription::{RetryPolicy, TranscriptionClient};

/// Everything the pipeline produced for one audio file.
#[derive(Debug)]
pub struct PipelineReport {
    pub transcript: String,
    pub meeting_info: MeetingInfo,
    pub outcome: ScheduleOutcome,
}

/// Meeting scheduling pipeline
pub struct Pipeline {
    chunker: Chunker,
    transcription: TranscriptionClient,
    extractor: MeetingInfoExtractor,
    gate: SchedulingGate,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        chunker: Chunker,
        transcription: TranscriptionClient,
        extractor: MeetingInfoExtractor,
        gate: SchedulingGate,
    ) -> Self {
        Self {
            chunker,
            transcription,
            extractor,
            gate,
        }
    }

    /// Build the pipeline with real service clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let api_key = config.groq_api_key().ok_or_else(|| {
            internal_error(
                InternalErrorKind::Config,
                "GROQ_CLOUD_API_KEY is not configured",
            )
        })?;

        let timezone = config.calendar_timezone().ok_or_else(|| {
            internal_error(
                InternalErrorKind::Config,
                "CALENDAR_TIMEZONE is not a valid IANA time zone",
            )
        })?;

        let groq = Arc::new(GroqClient::new(
            SecretString::from(api_key),
            config.groq_base_url(),
            &config.transcription_model,
            &config.extraction_model,
        )?);

        let credentials =
            CredentialManager::new(config.token_cache_path.clone(), config.google_token_url())?;
        let calendar = Arc::new(GoogleCalendarClient::new(
            config.calendar_base_url(),
            credentials,
        )?);

        let chunker = Chunker::new(
            config.max_chunk_secs,
            config.audio_split_threshold_bytes,
            config.segment_scratch_dir(),
        );

        let transcription = TranscriptionClient::new(
            groq.clone(),
            RetryPolicy {
                max_attempts: config.transcription_retries,
                delay: Duration::from_secs(config.transcription_retry_delay_secs),
            },
        );

        let extractor = MeetingInfoExtractor::new(
            groq,
            RetryPolicy {
                max_attempts: config.extraction_retries,
                delay: Duration::from_secs(config.extraction_retry_delay_secs),
            },
        );

        let gate = SchedulingGate::new(calendar, config.calendar_id.clone(), timezone);

        Ok(Self::new(chunker, transcription, extractor, gate))
    }

    /// Process one audio file through every stage.
    pub async fn run(&self, audio_path: &Path) -> Result<PipelineReport, Error> {
        let source = AudioSource::open(audio_path)?;
        info!(
            "Processing {} ({} bytes)",
            source.path().display(),
            source.size_bytes()
        );

        let segments = self.chunker.split(&source)?;
        info!("Transcribing {} segment(s)", segments.len());

        let fragments = self.transcription.transcribe_segments(segments).await;
        let failed = fragments
            .iter()
            .filter(|fragment| fragment.is_failed())
            .count();
        if failed > 0 {
            warn!("{} of {} segment(s) failed to transcribe", failed, fragments.len());
        }

        let transcript = assembler::assemble(&fragments)?;
        debug!("Assembled transcript ({} chars)", transcript.len());

        let meeting_info = self.extractor.extract(&transcript).await?;
        info!(
            "Extracted meeting '{}' at {}",
            meeting_info.subject,
            meeting_info.composite_date_time()
        );

        let outcome = self.gate.schedule(&meeting_info).await?;
        match &outcome {
            ScheduleOutcome::Scheduled { html_link } => {
                info!(
                    "Meeting scheduled{}",
                    html_link
                        .as_deref()
                        .map(|link| format!(": {link}"))
                        .unwrap_or_default()
                );
            }
            ScheduleOutcome::Skipped { reason } => {
                info!("Scheduling skipped: {}", reason);
            }
        }

        Ok(PipelineReport {
            transcript,
            meeting_info,
            outcome,
        })
    }
}
