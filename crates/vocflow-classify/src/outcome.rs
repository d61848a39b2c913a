//! The two shapes a classification attempt can end in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeCategory {
    pub category: String,
    pub confidence: f64,
}

/// A successful classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub source_id: String,
    pub category: String,
    /// In \[0, 1\].
    pub confidence: f64,
    /// Runner-up categories in the order the service ranked them.
    pub alternative_categories: Vec<AlternativeCategory>,
    pub problem_situation: String,
    pub solution_approach: String,
    pub expected_outcome: String,
}

/// Why no classification was produced.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ClassificationFailure {
    #[error("automatic classification is disabled")]
    Disabled,

    #[error("classification service is unhealthy")]
    Unhealthy,

    #[error("classification timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("classification service returned {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("transport error: {message}")]
    TransportError { message: String },

    #[error("classification service rejected the request: {message}")]
    ServiceRejected { message: String },
}

/// Outcome of one classification attempt. Always exactly one of the two.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClassificationResult {
    Success(Classification),
    Failure(ClassificationFailure),
}

impl ClassificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Success(c) => Some(c),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ClassificationFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(f),
        }
    }

    pub fn into_result(self) -> Result<Classification, ClassificationFailure> {
        self.into()
    }
}

impl From<Result<Classification, ClassificationFailure>> for ClassificationResult {
    fn from(result: Result<Classification, ClassificationFailure>) -> Self {
        match result {
            Ok(c) => Self::Success(c),
            Err(f) => Self::Failure(f),
        }
    }
}

impl From<ClassificationResult> for Result<Classification, ClassificationFailure> {
    fn from(result: ClassificationResult) -> Self {
        match result {
            ClassificationResult::Success(c) => Ok(c),
            ClassificationResult::Failure(f) => Err(f),
        }
    }
}
