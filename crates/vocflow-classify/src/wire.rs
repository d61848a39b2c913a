//! JSON bodies returned by the classification service.

use serde::{Deserialize, Serialize};

use crate::outcome::AlternativeCategory;

/// Reply to `POST /classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ReplyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceReply {
    /// Parse a reply body. `data` is decoded only when `success` is true, so a
    /// rejection carrying a partial payload is still read as a rejection.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(body)?;
        let data = match envelope.data {
            Some(raw) if envelope.success => Some(serde_json::from_value(raw)?),
            _ => None,
        };
        Ok(Self {
            success: envelope.success,
            data,
            message: envelope.message,
            error: envelope.error,
        })
    }
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyData {
    #[serde(default)]
    pub source_id: String,
    pub consulting_category: String,
    pub classification: ReplyScores,
    pub analysis: ReplyAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyScores {
    pub confidence: f64,
    #[serde(default)]
    pub alternative_categories: Vec<AlternativeCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyAnalysis {
    #[serde(default)]
    pub problem_situation: String,
    #[serde(default)]
    pub solution_approach: String,
    #[serde(default)]
    pub expected_outcome: String,
}

/// Reply to `GET /classify/history?sourceId=..`, newest entry first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReply {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<HistoryEntry>,
}

/// A previously stored classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub source_id: String,
    pub consulting_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ReplyScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ReplyAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_success_reply() {
        let json = r#"{
            "success": true,
            "data": {
                "id": 42,
                "sourceId": "abcdef12",
                "consultingCategory": "도난/분실 신청/해제",
                "classification": {
                    "confidence": 0.91,
                    "alternative_categories": [
                        {"category": "결제일 안내/변경", "confidence": 0.05}
                    ]
                },
                "analysis": {
                    "problem_situation": "카드 분실",
                    "solution_approach": "분실 신고 접수",
                    "expected_outcome": "카드 재발급"
                }
            }
        }"#;
        let reply = ServiceReply::from_json(json).unwrap();
        let data = reply.data.unwrap();
        assert_eq!(data.source_id, "abcdef12");
        assert_eq!(data.classification.alternative_categories.len(), 1);
        assert_eq!(data.analysis.expected_outcome, "카드 재발급");
    }

    #[test]
    fn parses_rejection_without_data() {
        let reply: ServiceReply =
            serde_json::from_str(r#"{"success": false, "message": "content too short"}"#).unwrap();
        assert!(!reply.success);
        assert!(reply.data.is_none());
        assert_eq!(reply.message.as_deref(), Some("content too short"));
    }

    #[test]
    fn rejection_with_partial_data_keeps_message() {
        let json = r#"{
            "success": false,
            "message": "분류 모델 오류",
            "data": {"sourceId": "abcdef12"}
        }"#;
        let reply = ServiceReply::from_json(json).unwrap();
        assert!(!reply.success);
        assert!(reply.data.is_none());
        assert_eq!(reply.message.as_deref(), Some("분류 모델 오류"));
    }

    #[test]
    fn success_with_partial_data_is_an_error() {
        let json = r#"{"success": true, "data": {"sourceId": "abcdef12"}}"#;
        assert!(ServiceReply::from_json(json).is_err());
    }

    #[test]
    fn null_data_is_absent() {
        let reply = ServiceReply::from_json(r#"{"success": true, "data": null}"#).unwrap();
        assert!(reply.data.is_none());
    }

    #[test]
    fn history_tolerates_missing_data() {
        let reply: HistoryReply = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(reply.data.is_empty());
    }
}
