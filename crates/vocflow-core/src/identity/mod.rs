//! Client identity derived from an identity number spoken in a transcript.
//!
//! [`extract_identity`] finds a raw `yymmdd` + code pair in free text,
//! [`validate_identity`] checks it, and [`extract_and_validate_identity`]
//! combines both into a [`ClientIdentity`] that is always produced.

mod extract;
mod validate;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use extract::{RawIdentityPair, extract_identity};
pub use validate::{MAX_AGE, ParsedIdentity, ValidationError, validate_identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported client identity.
///
/// `age` is decade-bucketed. When extraction or validation fails the
/// identity is [`ClientIdentity::fallback`] with the reason attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    pub gender: Gender,
    pub age: u32,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl ClientIdentity {
    pub const FALLBACK_GENDER: Gender = Gender::Male;
    pub const FALLBACK_AGE: u32 = 30;

    /// The fixed identity used whenever no valid identity is available.
    pub fn fallback(reason: Option<String>) -> Self {
        Self {
            gender: Self::FALLBACK_GENDER,
            age: Self::FALLBACK_AGE,
            is_valid: false,
            validation_error: reason,
        }
    }
}

impl From<ParsedIdentity> for ClientIdentity {
    fn from(parsed: ParsedIdentity) -> Self {
        Self {
            gender: parsed.gender,
            age: parsed.age_bucket(),
            is_valid: true,
            validation_error: None,
        }
    }
}

/// Extract and validate the client identity in `text`.
///
/// Never fails: a missing or invalid identity number yields the fallback.
pub fn extract_and_validate_identity(text: &str, current_year: i32) -> ClientIdentity {
    let Some(pair) = extract_identity(text) else {
        return ClientIdentity::fallback(Some("identity number not found".to_string()));
    };

    match validate_identity(&pair, current_year) {
        Ok(parsed) => parsed.into(),
        Err(e) => {
            tracing::debug!(error = %e, "identity number rejected");
            ClientIdentity::fallback(Some(e.to_string()))
        }
    }
}
