//! Shared types for the price-list reconciliation review system
//!
//! Contains the domain model of reconciliation records and master catalog
//! entries, the wire messages of the matching service, and the logging
//! setup used by every binary.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{CommitResponse, ErrorBody, MatchRunSummary, RecordPayload, UploadReceipt};
