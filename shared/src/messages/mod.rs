//! Wire messages exchanged with the matching service
//!
//! This module organizes the HTTP payloads by endpoint family:
//! - `results`: reconciliation records as the results endpoint returns them
//! - `actions`: acknowledgements of upload, automatic match and manual match

pub mod actions;
pub mod results;

pub use actions::{CommitResponse, ErrorBody, MatchRunSummary, UploadReceipt};
pub use results::RecordPayload;
