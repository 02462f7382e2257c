//! Scheduling gate: conflict check then event creation.
//!
//! The conflict check is a read-then-write against an external calendar
//! with no transactional guarantee: another client can insert an event
//! between the list and the insert. The gate is therefore a best-effort
//! idempotency guard, not a hard guarantee against races.

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use log::*;
use meeting_ai::traits::calendar;
use meeting_ai::types::calendar::NewEvent;
use meeting_ai::{CalendarSlot, MeetingInfo};

use crate::error::{pipeline_error, Error, ExternalErrorKind, PipelineErrorKind};

/// The exact composite layout produced by extraction: `YYYY-MM-DDThh:mm:AM/PM`.
pub const COMPOSITE_DATE_TIME_LAYOUT: &str = "%Y-%m-%dT%I:%M:%p";

/// Terminal state of a scheduling attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    /// The event was created; `html_link` points at it when the provider
    /// returned one.
    Scheduled { html_link: Option<String> },
    /// An existing event occupies the slot; nothing was created.
    Skipped { reason: String },
}

/// Creates a calendar event for a meeting unless the slot is occupied.
pub struct SchedulingGate {
    calendar: Arc<dyn calendar::Provider>,
    calendar_id: String,
    timezone: Tz,
}

impl SchedulingGate {
    pub fn new(calendar: Arc<dyn calendar::Provider>, calendar_id: String, timezone: Tz) -> Self {
        Self {
            calendar,
            calendar_id,
            timezone,
        }
    }

    /// Attempt to schedule `info`.
    ///
    /// A composite date/time that does not match the expected layout yields
    /// `InvalidTimeFormat` before any calendar call, so a malformed record
    /// can never mutate the calendar.
    pub async fn schedule(&self, info: &MeetingInfo) -> Result<ScheduleOutcome, Error> {
        let slot = self.slot_for(info)?;

        debug!(
            "Checking calendar {} for conflicts in [{}, {})",
            self.calendar_id,
            slot.start.to_rfc3339(),
            slot.end.to_rfc3339()
        );

        let existing = self
            .calendar
            .list_events(&self.calendar_id, slot.start, slot.end)
            .await
            .map_err(|e| {
                warn!("Conflict check failed: {}", e);
                Error::from(e)
            })?;

        if !existing.is_empty() {
            info!(
                "Slot at {} already holds {} event(s); skipping",
                slot.start.to_rfc3339(),
                existing.len()
            );
            return Ok(ScheduleOutcome::Skipped {
                reason: "a meeting already exists at this date and time".to_string(),
            });
        }

        let event = NewEvent {
            summary: info.subject.clone(),
            description: format!(
                "Participants: {}\nSummary: {}",
                info.participants.join(", "),
                info.summary
            ),
            start: slot.start,
            end: slot.end,
            time_zone: self.timezone.name().to_string(),
        };

        let created = self
            .calendar
            .insert_event(&self.calendar_id, &event)
            .await
            .map_err(|e| {
                error!("Event creation failed: {}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: crate::error::DomainErrorKind::External(
                        ExternalErrorKind::Calendar("failed to create event".to_string()),
                    ),
                }
            })?;

        info!(
            "Event created: {}",
            created.html_link.as_deref().unwrap_or("<no link>")
        );
        Ok(ScheduleOutcome::Scheduled {
            html_link: created.html_link,
        })
    }

    /// Derive the 1-hour slot from the record's composite date/time string,
    /// localized to the gate's fixed time zone.
    fn slot_for(&self, info: &MeetingInfo) -> Result<CalendarSlot, Error> {
        let composite = info.composite_date_time();
        let naive = NaiveDateTime::parse_from_str(&composite, COMPOSITE_DATE_TIME_LAYOUT)
            .map_err(|e| {
                error!("Invalid date/time format {:?}: {}", composite, e);
                pipeline_error(PipelineErrorKind::InvalidTimeFormat, &e.to_string())
            })?;

        let start = self
            .timezone
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| {
                error!(
                    "Local time {} is ambiguous or nonexistent in {}",
                    naive, self.timezone
                );
                pipeline_error(
                    PipelineErrorKind::InvalidTimeFormat,
                    "ambiguous or nonexistent local time",
                )
            })?;

        Ok(CalendarSlot::starting_at(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use async_trait::async_trait;
    use chrono::{DateTime, Timelike};
    use meeting_ai::types::calendar::Event;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CalendarDouble {
        existing: Vec<Event>,
        list_calls: AtomicUsize,
        insert_calls: AtomicUsize,
        last_inserted: Mutex<Option<NewEvent>>,
    }

    impl CalendarDouble {
        fn with_existing(existing: Vec<Event>) -> Self {
            Self {
                existing,
                list_calls: AtomicUsize::new(0),
                insert_calls: AtomicUsize::new(0),
                last_inserted: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl calendar::Provider for CalendarDouble {
        async fn list_events(
            &self,
            _calendar_id: &str,
            _time_min: DateTime<Tz>,
            _time_max: DateTime<Tz>,
        ) -> Result<Vec<Event>, meeting_ai::Error> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.existing.clone())
        }

        async fn insert_event(
            &self,
            _calendar_id: &str,
            event: &NewEvent,
        ) -> Result<Event, meeting_ai::Error> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_inserted.lock().unwrap() = Some(event.clone());
            Ok(Event {
                id: Some("evt_1".to_string()),
                summary: Some(event.summary.clone()),
                html_link: Some("https://calendar.example/evt_1".to_string()),
            })
        }

        fn provider_id(&self) -> &str {
            "double"
        }
    }

    fn demo_meeting() -> MeetingInfo {
        MeetingInfo {
            subject: "Demo".to_string(),
            date: "2024-05-21".to_string(),
            time: "09:00:PM".to_string(),
            participants: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            summary: "Walkthrough".to_string(),
        }
    }

    fn gate(double: Arc<CalendarDouble>) -> SchedulingGate {
        SchedulingGate::new(double, "primary".to_string(), chrono_tz::Asia::Kolkata)
    }

    #[tokio::test]
    async fn test_conflict_skips_without_creating() {
        let double = Arc::new(CalendarDouble::with_existing(vec![Event {
            id: Some("busy".to_string()),
            summary: Some("Standup".to_string()),
            html_link: None,
        }]));
        let outcome = gate(double.clone()).schedule(&demo_meeting()).await.unwrap();

        assert!(matches!(outcome, ScheduleOutcome::Skipped { .. }));
        assert_eq!(double.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(double.insert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_free_slot_creates_event_with_link() {
        let double = Arc::new(CalendarDouble::with_existing(vec![]));
        let outcome = gate(double.clone()).schedule(&demo_meeting()).await.unwrap();

        assert_eq!(
            outcome,
            ScheduleOutcome::Scheduled {
                html_link: Some("https://calendar.example/evt_1".to_string())
            }
        );
        assert_eq!(double.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slot_round_trips_to_localized_start() {
        let double = Arc::new(CalendarDouble::with_existing(vec![]));
        gate(double.clone()).schedule(&demo_meeting()).await.unwrap();

        let inserted = double.last_inserted.lock().unwrap().clone().unwrap();
        // 09:00:PM on 2024-05-21 is 21:00 local in the fixed zone.
        assert_eq!(inserted.start.date_naive().to_string(), "2024-05-21");
        assert_eq!(inserted.start.hour(), 21);
        assert_eq!(inserted.start.minute(), 0);
        assert_eq!(inserted.end - inserted.start, chrono::Duration::hours(1));
        assert_eq!(inserted.time_zone, "Asia/Kolkata");
        assert!(inserted.description.contains("Participants: a@example.com, b@example.com"));
        assert!(inserted.description.contains("Summary: Walkthrough"));
    }

    #[tokio::test]
    async fn test_malformed_composite_is_invalid_time_format() {
        let double = Arc::new(CalendarDouble::with_existing(vec![]));
        let mut broken = demo_meeting();
        broken.time = "9 o'clock".to_string();

        let err = gate(double.clone()).schedule(&broken).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Pipeline(PipelineErrorKind::InvalidTimeFormat)
        );
        // Safe no-op: no calendar traffic at all.
        assert_eq!(double.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(double.insert_calls.load(Ordering::SeqCst), 0);
    }
}
