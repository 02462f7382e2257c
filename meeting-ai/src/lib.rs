//! Meeting AI abstraction layer for transcription, extraction, and calendar providers.
//!
//! This crate provides trait-based abstractions for the meeting-scheduling workflow:
//! - Speech-to-text transcription of audio segments
//! - LLM chat completion used to extract structured meeting metadata
//! - Calendar queries and event creation
//!
//! The design is provider-agnostic, enabling applications to swap between
//! different service providers (Groq Whisper, OpenAI, Google Calendar, etc.)
//! without changing pipeline code.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use types::meeting::{CalendarSlot, MeetingInfo};
pub use types::transcript::{TranscriptFragment, TRANSCRIPTION_FAILED_SENTINEL};
