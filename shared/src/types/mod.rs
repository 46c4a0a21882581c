//! Core types used throughout the reconciliation review system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::SharedError;

pub mod record;
pub mod selection;

pub use record::{
    CatalogMatch, Confidence, MasterCatalogEntry, MatchType, ReconciliationRecord, Resolution,
};
pub use selection::{ExportFormat, FilterSelection, ResultStatus};

/// Identifier of a supplier line item, stable across refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(RecordId)
            .map_err(|_| SharedError::InvalidId { input: s.to_string() })
    }
}

/// Identifier of a master catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterEntryId(pub i64);

impl fmt::Display for MasterEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MasterEntryId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(MasterEntryId)
            .map_err(|_| SharedError::InvalidId { input: s.to_string() })
    }
}

/// Identity of one manual match session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Component tag attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Results store and its refresh pipeline
    Store,
    /// Manual match session
    Session,
    /// Upload-and-trigger workflow
    Uploader,
    /// HTTP client for the matching service
    Client,
    /// Command line front end
    Cli,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Store => write!(f, "results_store"),
            Component::Session => write!(f, "match_session"),
            Component::Uploader => write!(f, "uploader"),
            Component::Client => write!(f, "matching_client"),
            Component::Cli => write!(f, "cli"),
        }
    }
}
