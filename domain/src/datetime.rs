//! Natural-language date/time normalization.
//!
//! The LLM returns free-form expressions like "tomorrow", "next Monday",
//! "2024-05-20", "9 PM", or "15:00". This module resolves them into one
//! absolute timestamp relative to a caller-supplied "now", then formats the
//! date as `YYYY-MM-DD` and the time on a 12-hour clock as `hh:mm:AM|PM`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

const ABSOLUTE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Resolve a date and a time expression into formatted absolute values.
///
/// Returns `None` when either expression cannot be parsed; callers decide
/// whether that is a hard error (this pipeline treats it as one, since the
/// scheduling gate cannot tolerate non-normalized values).
pub fn normalize_date_time(
    date_str: &str,
    time_str: &str,
    now: NaiveDateTime,
) -> Option<(String, String)> {
    let date = parse_date_expression(date_str, now.date())?;
    let time = parse_time_expression(time_str)?;

    let combined = NaiveDateTime::new(date, time);
    Some((
        combined.format("%Y-%m-%d").to_string(),
        combined.format("%I:%M:%p").to_string(),
    ))
}

/// Parse a natural-language or absolute date expression relative to `today`.
pub fn parse_date_expression(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let normalized = raw.trim().to_lowercase();

    match normalized.as_str() {
        "today" | "tonight" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "day after tomorrow" => return Some(today + Duration::days(2)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = normalized.strip_prefix("next ") {
        if let Some(weekday) = parse_weekday(rest) {
            return Some(next_weekday(today, weekday));
        }
    }

    // A bare weekday means the upcoming occurrence, today included.
    if let Some(weekday) = parse_weekday(&normalized) {
        return Some(upcoming_weekday(today, weekday));
    }

    for format in ABSOLUTE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(normalized.trim(), format) {
            return Some(date);
        }
    }

    None
}

/// Parse a wall-clock time expression such as "9 PM", "9:30 pm", "15:00",
/// or the already-normalized "09:00:PM" layout.
pub fn parse_time_expression(raw: &str) -> Option<NaiveTime> {
    let normalized = raw.trim().to_lowercase().replace('.', "");

    match normalized.as_str() {
        "noon" | "midday" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let (body, meridiem) = if let Some(body) = normalized.strip_suffix("pm") {
        (body, Some(Meridiem::Pm))
    } else if let Some(body) = normalized.strip_suffix("am") {
        (body, Some(Meridiem::Am))
    } else {
        (normalized.as_str(), None)
    };

    let fields: Vec<&str> = body
        .trim_end_matches([' ', ':'])
        .split(':')
        .map(str::trim)
        .collect();
    if fields.is_empty() || fields.len() > 3 {
        return None;
    }

    let hour: u32 = fields[0].parse().ok()?;
    let minute: u32 = match fields.get(1) {
        Some(field) => field.parse().ok()?,
        None => 0,
    };
    let second: u32 = match fields.get(2) {
        Some(field) => field.parse().ok()?,
        None => 0,
    };

    let hour = match meridiem {
        Some(Meridiem::Pm) if hour == 12 => 12,
        Some(Meridiem::Pm) if hour < 12 => hour + 12,
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(Meridiem::Am) if hour < 12 => hour,
        Some(_) => return None,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

#[derive(Debug, Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Upcoming occurrence of `weekday`, counting today as a match.
fn upcoming_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    today + Duration::days(offset as i64)
}

/// Strictly-future occurrence of `weekday`: "next Monday" on a Monday is a
/// week away.
fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
    let offset = if offset == 0 { 7 } else { offset };
    today + Duration::days(offset as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        // 2024-05-20 is a Monday.
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_tomorrow_at_9_pm() {
        let (date, time) = normalize_date_time("tomorrow", "9 PM", now()).unwrap();
        assert_eq!(date, "2024-05-21");
        assert_eq!(time, "09:00:PM");
    }

    #[test]
    fn test_today_at_24h_time() {
        let (date, time) = normalize_date_time("today", "15:00", now()).unwrap();
        assert_eq!(date, "2024-05-20");
        assert_eq!(time, "03:00:PM");
    }

    #[test]
    fn test_absolute_iso_date() {
        let (date, time) = normalize_date_time("2024-06-01", "8:30 am", now()).unwrap();
        assert_eq!(date, "2024-06-01");
        assert_eq!(time, "08:30:AM");
    }

    #[test]
    fn test_month_name_date() {
        let (date, _) = normalize_date_time("May 25, 2024", "noon", now()).unwrap();
        assert_eq!(date, "2024-05-25");
    }

    #[test]
    fn test_next_monday_from_a_monday_is_a_week_out() {
        let date = parse_date_expression("next Monday", now().date()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 27).unwrap());
    }

    #[test]
    fn test_bare_weekday_is_upcoming_occurrence() {
        let date = parse_date_expression("friday", now().date()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 24).unwrap());
    }

    #[test]
    fn test_already_normalized_time_round_trips() {
        let time = parse_time_expression("09:00:PM").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
    }

    #[test]
    fn test_midnight_and_noon_keywords() {
        assert_eq!(
            parse_time_expression("midnight").unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_expression("12 PM").unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time_expression("12 AM").unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unparseable_expressions_yield_none() {
        assert!(normalize_date_time("whenever works", "9 PM", now()).is_none());
        assert!(normalize_date_time("tomorrow", "after lunch", now()).is_none());
        assert!(parse_time_expression("25:00").is_none());
        assert!(parse_time_expression("13 PM").is_none());
    }
}
