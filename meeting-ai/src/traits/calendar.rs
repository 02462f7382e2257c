//! Calendar provider trait.

use crate::types::calendar::{Event, NewEvent};
use crate::Error;
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;

/// Abstraction for remote calendar services.
///
/// Only the two operations the scheduling gate consumes are modeled:
/// listing events in a time window and inserting a new event. Credential
/// lifecycle lives behind the implementation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// List events in the half-open interval [`time_min`, `time_max`).
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> Result<Vec<Event>, Error>;

    /// Insert a new event and return the created record.
    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> Result<Event, Error>;

    /// Return unique identifier for this provider (e.g., "google_calendar").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;
}
