//! Classification orchestration: gating, health probing, bounded calls to the
//! external consultation classifier, and shaping of every outcome into a
//! [`ClassificationResult`].

pub mod batch;
pub mod config;
pub mod history;
pub mod orchestrator;
pub mod outcome;
pub mod status;
pub mod transport;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchItem, BatchOptions, BatchOutcome, BatchSummary, ItemStatus, classify_batch};
pub use config::ClassifierConfig;
pub use history::latest_classification;
pub use orchestrator::{classify_consultation, classify_consultation_at};
pub use outcome::{AlternativeCategory, Classification, ClassificationFailure, ClassificationResult};
pub use status::{ServiceState, ServiceStatus, service_status};
pub use transport::{ClassificationTransport, HttpTransport, TransportError};
pub use wire::{HistoryEntry, HistoryReply, ServiceReply};
