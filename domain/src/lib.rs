//! The domain layer: business logic for turning a recorded meeting into a
//! calendar event.
//!
//! Stages live in their own modules and are composed by [`pipeline`]:
//! [`chunker`] splits large audio into bounded segments, [`transcription`]
//! turns segments into text with per-segment degradation, [`assembler`]
//! joins the fragments, [`extraction`] pulls structured meeting info out of
//! the transcript, and [`scheduler`] decides whether a calendar event gets
//! created. [`gateway`] holds the HTTP clients for Groq and Google Calendar.

pub mod assembler;
pub mod chunker;
pub mod datetime;
pub mod error;
pub mod extraction;
pub mod gateway;
pub mod pipeline;
pub mod scheduler;
pub mod transcription;

pub use error::Error;
pub use pipeline::{Pipeline, PipelineReport};
pub use scheduler::ScheduleOutcome;
