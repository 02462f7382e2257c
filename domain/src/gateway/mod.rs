//! HTTP clients for the external services the pipeline depends on.

pub mod google_calendar;
pub mod groq;

pub use google_calendar::GoogleCalendarClient;
pub use groq::GroqClient;
