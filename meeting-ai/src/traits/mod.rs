//! Provider traits for the meeting-scheduling workflow.

pub mod calendar;
pub mod completion;
pub mod transcription;
