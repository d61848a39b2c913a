//! Core types for vocflow: client identity extraction and validation, and
//! assembly of consultation transcripts into classification requests.
//!
//! Everything in this crate is pure and synchronous. Network access lives in
//! `vocflow-classify`.

pub mod consultation;
pub mod identity;
pub mod request;

pub use consultation::{
    Consultation, ConsultationMetadata, Message, Role, StoredConsultation, Transcript,
    TranscriptError, iso_timestamp,
};
pub use identity::{
    ClientIdentity, Gender, ParsedIdentity, RawIdentityPair, ValidationError,
    extract_and_validate_identity, extract_identity, validate_identity,
};
pub use request::ClassificationRequest;
