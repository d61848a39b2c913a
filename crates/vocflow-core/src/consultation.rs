//! Consultation assembly: a chat transcript flattened into the text and
//! metadata the classification service consumes.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Gender;

/// Characters of the session id kept as the consultation's source id.
const SOURCE_ID_LEN: usize = 8;

const UNKNOWN_DURATION: &str = "알 수 없음";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used in the flattened transcript.
    pub fn speaker(&self) -> &'static str {
        match self {
            Self::User => "고객",
            Self::Assistant => "상담원",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, alias = "text")]
    pub content: String,
}

/// A finished consultation session as captured by the transcript log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub messages: Vec<Message>,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "endTime")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("session id is empty")]
    EmptySessionId,
    #[error("transcript has no messages")]
    NoMessages,
}

/// Per-consultation metadata sent alongside the transcript text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationMetadata {
    pub source_id: String,
    /// Start of the consultation, minute precision.
    pub consulting_at: DateTime<Utc>,
    pub consulting_turns: u32,
    /// Length of the flattened transcript in characters.
    pub consulting_length: u32,
    /// Human-readable duration, e.g. `"3분 12초"`.
    pub duration: String,
}

impl ConsultationMetadata {
    /// `consulting_at` as an ISO 8601 UTC timestamp with milliseconds.
    pub fn consulting_date_iso(&self) -> String {
        iso_timestamp(&self.consulting_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub content: String,
    pub metadata: ConsultationMetadata,
}

impl Transcript {
    /// Flatten the transcript into a [`Consultation`].
    ///
    /// `now` stands in for a missing start or end time.
    pub fn assemble(&self, now: DateTime<Utc>) -> Result<Consultation, TranscriptError> {
        if self.session_id.trim().is_empty() {
            return Err(TranscriptError::EmptySessionId);
        }
        if self.messages.is_empty() {
            return Err(TranscriptError::NoMessages);
        }

        let content = self
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role.speaker(), m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let start = self.start_time.unwrap_or(now);
        let consulting_at = start
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(start);

        let metadata = ConsultationMetadata {
            source_id: source_id(&self.session_id),
            consulting_at,
            consulting_turns: self.messages.len() as u32,
            consulting_length: content.chars().count() as u32,
            duration: describe_duration(self.start_time, self.end_time),
        };

        Ok(Consultation { content, metadata })
    }
}

/// A consultation already persisted with its client identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConsultation {
    #[serde(alias = "sourceId")]
    pub source_id: String,
    #[serde(alias = "consultingDate")]
    pub consulting_date: DateTime<Utc>,
    #[serde(alias = "clientGender")]
    pub client_gender: Gender,
    #[serde(alias = "clientAge")]
    pub client_age: u32,
    #[serde(alias = "consultingTurns")]
    pub consulting_turns: u32,
    #[serde(alias = "consultingLength")]
    pub consulting_length: u32,
    #[serde(alias = "consultingContent")]
    pub consulting_content: String,
}

/// ISO 8601 UTC with millisecond precision and a `Z` suffix.
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn source_id(session_id: &str) -> String {
    let len = session_id.chars().count();
    session_id
        .chars()
        .skip(len.saturating_sub(SOURCE_ID_LEN))
        .collect()
}

fn describe_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return UNKNOWN_DURATION.to_string();
    };
    let millis = (end - start).num_milliseconds();
    if millis < 0 {
        return UNKNOWN_DURATION.to_string();
    }
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    format!("{minutes}분 {seconds}초")
}
