//! Shared types for the meeting-scheduling workflow.

pub mod calendar;
pub mod meeting;
pub mod transcript;
