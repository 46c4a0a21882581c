//! Reviewer-specific error types

use std::time::Duration;
use thiserror::Error;

use shared::{RecordId, SharedError};

/// Local validation failures, raised before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Supplier name is required")]
    MissingSupplierName,

    #[error("No price list file selected")]
    MissingFile,

    #[error("Unsupported file format: {file_name} (accepted: csv, xlsx, xls, xml)")]
    UnsupportedExtension { file_name: String },

    #[error("Search query is blank")]
    BlankQuery,

    #[error("No manual match session is open")]
    NoSession,

    #[error("A manual match commit is already in flight")]
    CommitInFlight,

    #[error("An upload is already in flight")]
    SubmitInFlight,

    #[error("Manual match session is closed")]
    SessionClosed,

    #[error("Record {record_id} is not in the loaded results")]
    RecordNotLoaded { record_id: RecordId },
}

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{operation} request failed: {message}")]
    Transport { operation: &'static str, message: String },

    #[error("{operation} returned HTTP {status}{}", detail_suffix(.detail))]
    HttpStatus {
        operation: &'static str,
        status: u16,
        detail: Option<String>,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },

    #[error("Manual match for record {record_id} was rejected: {detail}")]
    CommitConflict { record_id: RecordId, detail: String },

    #[error("Price list was stored but automatic matching failed: {source}")]
    MatchTriggerFailed {
        upload_message: String,
        #[source]
        source: Box<ReviewError>,
    },

    #[error("Data contract violation: {0}")]
    Contract(#[from] SharedError),

    #[error("Configuration error: {field}: {message}")]
    Config { field: String, message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

impl ReviewError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    /// Failure raised locally, before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Network, timeout or non-2xx failure of an external call
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::Timeout { .. }
        )
    }
}

pub type ReviewResult<T> = Result<T, ReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message_includes_detail() {
        let err = ReviewError::HttpStatus {
            operation: "upload",
            status: 400,
            detail: Some("Unsupported file format".to_string()),
        };
        assert_eq!(err.to_string(), "upload returned HTTP 400: Unsupported file format");

        let bare = ReviewError::HttpStatus {
            operation: "list results",
            status: 502,
            detail: None,
        };
        assert_eq!(bare.to_string(), "list results returned HTTP 502");
    }

    #[test]
    fn test_error_classification() {
        assert!(ReviewError::from(ValidationError::BlankQuery).is_validation());
        assert!(ReviewError::transport("search", "connection refused").is_transport());
        assert!(ReviewError::Timeout {
            operation: "search",
            after: Duration::from_secs(1)
        }
        .is_transport());
        assert!(!ReviewError::CommitConflict {
            record_id: RecordId(1),
            detail: "Supplier item not found".to_string()
        }
        .is_transport());
    }
}
