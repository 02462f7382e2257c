//! Google Calendar API client.
//!
//! Implements the calendar provider trait on top of the Calendar v3 REST
//! API, pulling access tokens from the persisted OAuth credential cache.

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use log::*;
use meeting_ai::traits::calendar;
use meeting_ai::types::calendar::{Event, NewEvent};
use meeting_ai::Error;
use meeting_auth::oauth::CredentialManager;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// One event as returned by the Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
}

impl From<EventResource> for Event {
    fn from(resource: EventResource) -> Self {
        Event {
            id: Some(resource.id),
            summary: resource.summary,
            html_link: resource.html_link,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<EventResource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct EventReminders {
    #[serde(rename = "useDefault")]
    use_default: bool,
}

#[derive(Debug, Serialize)]
struct InsertEventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
    reminders: EventReminders,
}

/// Google Calendar API client
pub struct GoogleCalendarClient {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialManager,
}

impl GoogleCalendarClient {
    /// Create a new calendar client backed by the given credential manager.
    pub fn new(base_url: &str, credentials: CredentialManager) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    async fn bearer_token(&self) -> Result<String, Error> {
        let token = self
            .credentials
            .access_token()
            .await
            .map_err(|e| Error::Authentication(e.to_string()))?;
        Ok(token.expose_secret().to_string())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, Error> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                warn!("Failed to parse calendar {} response: {:?}", operation, e);
                Error::Deserialization(format!("invalid {operation} response: {e}"))
            });
        }

        let error_text = response.text().await.unwrap_or_default();
        error!(
            "Calendar {} API error ({}): {}",
            operation, status, error_text
        );

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Err(Error::Authentication(error_text))
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(Error::RateLimited {
                retry_after_seconds: 0,
            })
        } else if status.is_server_error() {
            Err(Error::Provider(format!("{status}: {error_text}")))
        } else {
            Err(Error::Configuration(format!("{status}: {error_text}")))
        }
    }
}

#[async_trait]
impl calendar::Provider for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> Result<Vec<Event>, Error> {
        let token = self.bearer_token().await?;
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);

        debug!(
            "Listing events on {} between {} and {}",
            calendar_id,
            time_min.to_rfc3339(),
            time_max.to_rfc3339()
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let list: EventListResponse = Self::read_json(response, "list").await?;
        Ok(list.items.into_iter().map(Event::from).collect())
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> Result<Event, Error> {
        let token = self.bearer_token().await?;
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);

        let body = InsertEventRequest {
            summary: &event.summary,
            description: &event.description,
            start: EventTime {
                date_time: event.start.to_rfc3339(),
                time_zone: &event.time_zone,
            },
            end: EventTime {
                date_time: event.end.to_rfc3339(),
                time_zone: &event.time_zone,
            },
            reminders: EventReminders { use_default: true },
        };

        debug!("Inserting event '{}' on {}", event.summary, calendar_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let created: EventResource = Self::read_json(response, "insert").await?;
        Ok(created.into())
    }

    fn provider_id(&self) -> &str {
        "google_calendar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use meeting_ai::traits::calendar::Provider as _;
    use meeting_auth::oauth::StoredCredential;

    fn client_for(server: &mockito::ServerGuard, dir: &tempfile::TempDir) -> GoogleCalendarClient {
        let cache_path = dir.path().join("token.json");
        let credential = StoredCredential {
            token: "ya29.test".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".to_string()],
            expiry: Some(Utc::now() + Duration::hours(1)),
        };
        std::fs::write(&cache_path, serde_json::to_string(&credential).unwrap()).unwrap();

        let manager = CredentialManager::new(cache_path, "http://localhost:1/token").unwrap();
        GoogleCalendarClient::new(&server.url(), manager).unwrap()
    }

    fn window() -> (DateTime<Tz>, DateTime<Tz>) {
        let start = chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(2024, 5, 21, 21, 0, 0)
            .unwrap();
        (start, start + Duration::hours(1))
    }

    #[tokio::test]
    async fn test_list_events_sends_window_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/calendars/primary/events")
            .match_header("authorization", "Bearer ya29.test")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                mockito::Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
                mockito::Matcher::UrlEncoded(
                    "timeMin".into(),
                    "2024-05-21T21:00:00+05:30".into(),
                ),
                mockito::Matcher::UrlEncoded(
                    "timeMax".into(),
                    "2024-05-21T22:00:00+05:30".into(),
                ),
            ]))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "items": [
                        {"id": "evt1", "summary": "Standup", "htmlLink": "https://cal/evt1"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&server, &dir);
        let (time_min, time_max) = window();

        let events = client
            .list_events("primary", time_min, time_max)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Standup"));
        assert_eq!(events[0].html_link.as_deref(), Some("https://cal/evt1"));
    }

    #[tokio::test]
    async fn test_empty_item_list_is_empty_vec() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/primary/events")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind": "calendar#events"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&server, &dir);
        let (time_min, time_max) = window();

        let events = client
            .list_events("primary", time_min, time_max)
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_insert_event_posts_wire_body_and_returns_link() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/calendars/primary/events")
            .match_header("authorization", "Bearer ya29.test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "summary": "Planning",
                "description": "Participants: a@x.com\nSummary: roadmap",
                "start": {
                    "dateTime": "2024-05-21T21:00:00+05:30",
                    "timeZone": "Asia/Kolkata"
                },
                "end": {
                    "dateTime": "2024-05-21T22:00:00+05:30",
                    "timeZone": "Asia/Kolkata"
                },
                "reminders": {"useDefault": true}
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "id": "evt9",
                    "summary": "Planning",
                    "htmlLink": "https://cal/evt9"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&server, &dir);
        let (start, end) = window();

        let event = NewEvent {
            summary: "Planning".to_string(),
            description: "Participants: a@x.com\nSummary: roadmap".to_string(),
            start,
            end,
            time_zone: "Asia/Kolkata".to_string(),
        };

        let created = client.insert_event("primary", &event).await.unwrap();
        mock.assert_async().await;
        assert_eq!(created.html_link.as_deref(), Some("https://cal/evt9"));
    }

    #[tokio::test]
    async fn test_forbidden_is_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/primary/events")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"message": "insufficient scope"}}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&server, &dir);
        let (time_min, time_max) = window();

        let err = client
            .list_events("primary", time_min, time_max)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
