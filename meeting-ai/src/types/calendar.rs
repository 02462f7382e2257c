//! Provider-agnostic calendar event types.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An existing event returned by a calendar query.
///
/// Only the fields the scheduling gate consumes are modeled; provider
/// payloads carry far more and implementations drop the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    pub summary: Option<String>,
    /// Link to view the event in the provider's UI, when available.
    pub html_link: Option<String>,
}

/// Payload for creating a new calendar event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// IANA time zone name sent alongside the timestamps.
    pub time_zone: String,
}
