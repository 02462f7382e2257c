//! Error types for the `domain` layer.
use meeting_auth::error::{Error as MeetingAuthError, ErrorKind as MeetingAuthErrorKind};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure with
/// `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums for the kinds of errors that can occur in this layer or in lower
/// layers. The `source` field holds the original error that caused the
/// domain error, translating between layers while maintaining layer
/// boundaries: the binary depends on `domain`, and `domain` depends on
/// `meeting-ai`/`meeting-auth`, but the binary never sees those crates'
/// error types directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Pipeline(PipelineErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Auth,
    Calendar(String),
    Other(String),
}

/// Pipeline-stage failures with specific abort/degrade semantics.
#[derive(Debug, PartialEq)]
pub enum PipelineErrorKind {
    /// The audio source could not be decoded. Fatal; the pipeline aborts
    /// with no partial output.
    AudioDecode,
    /// Every segment degraded to the failure sentinel. Fatal; short-circuits
    /// before the LLM call.
    TotalTranscriptionFailure,
    /// The composite date/time string did not match `YYYY-MM-DDThh:mm:AM/PM`.
    /// Fatal to the scheduling attempt; no calendar mutation happens.
    InvalidTimeFormat,
    /// The extracted date or time expression could not be resolved to an
    /// absolute value. The record is discarded rather than scheduled at a
    /// silently-wrong time.
    Normalization,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

// Translate errors surfaced by the provider abstraction layer.
impl From<meeting_ai::Error> for Error {
    fn from(err: meeting_ai::Error) -> Self {
        let error_kind = match &err {
            meeting_ai::Error::Authentication(_) => {
                DomainErrorKind::External(ExternalErrorKind::Auth)
            }
            meeting_ai::Error::Network(_) | meeting_ai::Error::Timeout(_) => {
                DomainErrorKind::External(ExternalErrorKind::Network)
            }
            meeting_ai::Error::Configuration(msg) => {
                DomainErrorKind::Internal(InternalErrorKind::Other(msg.clone()))
            }
            other => DomainErrorKind::External(ExternalErrorKind::Other(other.to_string())),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

// Translate errors from the authentication layer.
impl From<MeetingAuthError> for Error {
    fn from(err: MeetingAuthError) -> Self {
        let error_kind = match &err.error_kind {
            MeetingAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            _ => DomainErrorKind::External(ExternalErrorKind::Auth),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Pipeline(PipelineErrorKind::AudioDecode),
        }
    }
}

/// Helper function to create internal errors.
pub fn internal_error(kind: InternalErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(kind),
    }
}

/// Helper function to create pipeline-stage errors.
pub fn pipeline_error(kind: PipelineErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Pipeline(kind),
    }
}
