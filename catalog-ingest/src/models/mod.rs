//! Data models for catalog-ingest
//!
//! Parsed candidates flow from the parser into the review session; import items
//! and outcomes flow through the executor.

pub mod import_result;
pub mod parsed_candidate;

pub use import_result::{ImportItem, ImportOutcome, ImportStatus, ImportSummary};
pub use parsed_candidate::{
    mean_confidence, ConfidenceTier, FieldConfidence, ParseMethod, ParsedCandidate,
};
