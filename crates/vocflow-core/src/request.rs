//! The payload posted to the classification service.

use serde::{Deserialize, Serialize};

use crate::consultation::{ConsultationMetadata, StoredConsultation, iso_timestamp};
use crate::identity::{ClientIdentity, Gender};

/// Immutable classification request, built once per consultation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub source_id: String,
    /// ISO 8601 UTC timestamp.
    pub consulting_date: String,
    pub client_gender: Gender,
    pub client_age: u32,
    pub consulting_turns: u32,
    pub consulting_length: u32,
    pub consulting_content: String,
}

impl ClassificationRequest {
    pub fn build(metadata: &ConsultationMetadata, identity: &ClientIdentity, content: &str) -> Self {
        Self {
            source_id: metadata.source_id.clone(),
            consulting_date: metadata.consulting_date_iso(),
            client_gender: identity.gender,
            client_age: identity.age,
            consulting_turns: metadata.consulting_turns,
            consulting_length: metadata.consulting_length,
            consulting_content: content.to_string(),
        }
    }
}

impl From<&StoredConsultation> for ClassificationRequest {
    fn from(stored: &StoredConsultation) -> Self {
        Self {
            source_id: stored.source_id.clone(),
            consulting_date: iso_timestamp(&stored.consulting_date),
            client_gender: stored.client_gender,
            client_age: stored.client_age,
            consulting_turns: stored.consulting_turns,
            consulting_length: stored.consulting_length,
            consulting_content: stored.consulting_content.clone(),
        }
    }
}
