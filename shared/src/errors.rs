//! Shared error types for the reconciliation review system

use thiserror::Error;

use crate::types::RecordId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Confidence {value} is outside 0..=100")]
    InvalidConfidence { value: f64 },

    #[error("Record {record_id} violates the data contract: {reason}")]
    ContractViolation { record_id: RecordId, reason: String },

    #[error("Unknown filter selection: {input}")]
    UnknownFilter { input: String },

    #[error("Unknown export format: {input}")]
    UnknownExportFormat { input: String },

    #[error("Invalid identifier: {input}")]
    InvalidId { input: String },
}

impl SharedError {
    /// Contract violation for a specific record
    pub fn contract(record_id: RecordId, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            record_id,
            reason: reason.into(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
