//! Meeting-info extraction from an assembled transcript.
//!
//! Sends a fixed prompt to a chat completion provider, digs a JSON object
//! out of the possibly-noisy response (reasoning traces, markdown fences),
//! and normalizes the free-form date/time expressions into absolute values.
//! Call and parse failures share one bounded retry budget, with a default
//! meeting record as the terminal fallback so the pipeline always produces
//! *some* record. Normalization failure is a hard error: the record is
//! discarded rather than scheduled at a silently-wrong time.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use log::*;
use meeting_ai::traits::completion;
use meeting_ai::MeetingInfo;
use serde::Deserialize;

use crate::datetime::normalize_date_time;
use crate::error::{pipeline_error, Error, PipelineErrorKind};
use crate::transcription::RetryPolicy;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that extracts key information from meeting transcripts.";

const DEFAULT_SUBJECT: &str = "Unknown Meeting";
const DEFAULT_PARTICIPANT: &str = "unknown@example.com";
const DEFAULT_SUMMARY: &str = "Failed to extract meeting information from the transcript.";

/// Key information as the model returns it, before normalization.
///
/// Field names mirror the JSON keys the prompt asks for.
#[derive(Debug, Deserialize)]
struct RawMeetingInfo {
    subject: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "time of the meeting")]
    time: String,
    #[serde(default)]
    participants: Vec<String>,
    summary: String,
}

/// Extracts a [`MeetingInfo`] record from a transcript via an LLM provider.
pub struct MeetingInfoExtractor {
    provider: Arc<dyn completion::Provider>,
    params: completion::Params,
    policy: RetryPolicy,
}

impl MeetingInfoExtractor {
    pub fn new(provider: Arc<dyn completion::Provider>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            params: completion::Params::default(),
            policy,
        }
    }

    /// Extract meeting info, resolving relative dates against the current
    /// local time.
    pub async fn extract(&self, transcript: &str) -> Result<MeetingInfo, Error> {
        self.extract_at(transcript, chrono::Local::now().naive_local())
            .await
    }

    /// Extract meeting info with an explicit relative-base for date/time
    /// normalization.
    pub async fn extract_at(
        &self,
        transcript: &str,
        now: NaiveDateTime,
    ) -> Result<MeetingInfo, Error> {
        let user_prompt = build_prompt(transcript);

        for attempt in 1..=self.policy.max_attempts {
            match self.attempt(&user_prompt).await {
                Ok(raw) => return self.normalize(raw, now),
                Err(e) if e.is_transient() => {
                    warn!(
                        "Transient extraction error (attempt {}/{}): {}",
                        attempt, self.policy.max_attempts, e
                    );
                }
                Err(e) => {
                    warn!(
                        "Extraction error (attempt {}/{}): {}",
                        attempt, self.policy.max_attempts, e
                    );
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        error!(
            "Extraction exhausted {} attempts; falling back to default meeting info",
            self.policy.max_attempts
        );
        Ok(default_meeting_info(now))
    }

    async fn attempt(&self, user_prompt: &str) -> Result<RawMeetingInfo, meeting_ai::Error> {
        let response = self
            .provider
            .complete(SYSTEM_PROMPT, user_prompt, &self.params)
            .await?;

        let cleaned = clean_response(&response);
        let json = first_json_object(&cleaned).ok_or_else(|| {
            meeting_ai::Error::Deserialization(
                "no JSON object found in model response".to_string(),
            )
        })?;

        serde_json::from_str(json).map_err(|e| meeting_ai::Error::Deserialization(e.to_string()))
    }

    fn normalize(&self, raw: RawMeetingInfo, now: NaiveDateTime) -> Result<MeetingInfo, Error> {
        let (date, time) = normalize_date_time(&raw.date, &raw.time, now).ok_or_else(|| {
            error!(
                "Failed to normalize date {:?} / time {:?}; discarding record",
                raw.date, raw.time
            );
            pipeline_error(
                PipelineErrorKind::Normalization,
                "could not resolve date/time to an absolute value",
            )
        })?;

        Ok(MeetingInfo {
            subject: raw.subject,
            date,
            time,
            participants: dedupe_preserving_order(raw.participants),
            summary: raw.summary,
        })
    }
}

/// Build the extraction prompt around the transcript.
fn build_prompt(transcript: &str) -> String {
    format!(
        "Extract the following key information from the text below and provide JSON output:\n\
         \n\
         1. Subject of the meeting\n\
         2. Date of the meeting (e.g., \"today\", \"tomorrow\", \"next Monday\", \"2024-05-20\")\n\
         3. Time of the meeting (e.g., \"9 PM\", \"15:00\")\n\
         4. Participants (extract EMAIL ADDRESSES of people involved or set Email which look real by using their name)\n\
         5. Summary of the conversation (key points discussed)\n\
         \n\
         Format the output as a JSON object with keys:\n\
         - subject\n\
         - Date\n\
         - time of the meeting\n\
         - participants (list of emails)\n\
         - summary\n\
         \n\
         Text:\n\
         {transcript}"
    )
}

/// Strip reasoning traces and markdown fences from a model response.
///
/// Models with visible chain-of-thought wrap it in `<think>...</think>`;
/// only the text after the final closing tag is the answer.
fn clean_response(response: &str) -> String {
    let answer = match response.rsplit_once("</think>") {
        Some((_, rest)) => rest,
        None => response,
    };

    answer.replace("```json", "").replace("```", "").trim().to_string()
}

/// Isolate the first balanced `{...}` region, skipping braces inside JSON
/// string literals.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

fn dedupe_preserving_order(participants: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    participants
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Terminal fallback when every extraction attempt failed.
fn default_meeting_info(now: NaiveDateTime) -> MeetingInfo {
    MeetingInfo {
        subject: DEFAULT_SUBJECT.to_string(),
        date: now.date().format("%Y-%m-%d").to_string(),
        time: "12:00:PM".to_string(),
        participants: vec![DEFAULT_PARTICIPANT.to_string()],
        summary: DEFAULT_SUMMARY.to_string(),
    }
}
