//! Structured meeting metadata extracted from a transcript.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Structured meeting record produced by the extraction stage.
///
/// `date` and `time` are already normalized to absolute values
/// (`YYYY-MM-DD` and 12-hour `hh:mm:AM|PM`) by the time a value of this
/// type exists; an unnormalizable record is an extraction error, not a
/// partially-filled `MeetingInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingInfo {
    pub subject: String,
    /// Absolute calendar date, formatted `YYYY-MM-DD`.
    pub date: String,
    /// Wall-clock time on a 12-hour clock, formatted `hh:mm:AM|PM`.
    pub time: String,
    /// Email-like participant identifiers, order-preserving and deduplicated.
    pub participants: Vec<String>,
    pub summary: String,
}

impl MeetingInfo {
    /// Composite date/time string in the `YYYY-MM-DDThh:mm:AM/PM` layout
    /// consumed by the scheduling gate.
    pub fn composite_date_time(&self) -> String {
        format!("{}T{}", self.date, self.time)
    }
}

/// A one-hour scheduling window derived from a meeting's start timestamp.
///
/// Used only as a query/insert parameter against the external calendar;
/// never persisted. The interval is half-open: [start, end).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSlot {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl CalendarSlot {
    /// Build the implicit 1-hour slot beginning at `start`.
    pub fn starting_at(start: DateTime<Tz>) -> Self {
        Self {
            end: start + Duration::hours(1),
            start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_composite_date_time_layout() {
        let info = MeetingInfo {
            subject: "Demo".to_string(),
            date: "2024-05-21".to_string(),
            time: "09:00:PM".to_string(),
            participants: vec!["a@example.com".to_string()],
            summary: "Walkthrough".to_string(),
        };
        assert_eq!(info.composite_date_time(), "2024-05-21T09:00:PM");
    }

    #[test]
    fn test_slot_spans_one_hour() {
        let start = chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(2024, 5, 21, 21, 0, 0)
            .unwrap();
        let slot = CalendarSlot::starting_at(start);
        assert_eq!(slot.end - slot.start, Duration::hours(1));
    }
}
