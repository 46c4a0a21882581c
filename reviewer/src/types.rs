//! Reviewer-internal types: freshness tokens, staged files, completion events

use std::fmt;
use std::path::Path;

use shared::{
    MasterCatalogEntry, MasterEntryId, MatchRunSummary, ReconciliationRecord, RecordId, SessionId,
};

use crate::error::ReviewResult;

/// Monotonic freshness token attached to every issued request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Offset/limit window applied to list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}

/// A price list selected by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceListFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PriceListFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a price list from disk, keeping only the file name
    pub async fn from_path(path: impl AsRef<Path>) -> ReviewResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// Lower-cased text after the last dot, if any
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
    }
}

/// Validated submission handed to the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceListUpload {
    pub supplier_name: String,
    pub file: PriceListFile,
}

/// Completion of a dispatched request, delivered back to the control loop
#[derive(Debug)]
pub enum ReviewEvent {
    ResultsLoaded {
        generation: Generation,
        result: ReviewResult<Vec<ReconciliationRecord>>,
    },
    SearchFinished {
        session: SessionId,
        generation: Generation,
        result: ReviewResult<Vec<MasterCatalogEntry>>,
    },
    CommitFinished {
        session: SessionId,
        result: ReviewResult<()>,
    },
    SubmissionFinished {
        result: ReviewResult<MatchRunSummary>,
    },
}

/// What applying a completion changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewUpdate {
    RecordsApplied { count: usize },
    SearchResultsApplied { count: usize },
    MatchCommitted { record_id: RecordId, master_id: MasterEntryId },
    SubmissionCompleted { summary: MatchRunSummary },
    /// Completion of a superseded or cancelled request
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReviewError;

    #[test]
    fn test_generation_is_monotonic() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "#1");
    }

    #[test]
    fn test_extension_uses_text_after_last_dot() {
        assert_eq!(PriceListFile::new("price.2024.XLSX", vec![]).extension().as_deref(), Some("xlsx"));
        assert_eq!(PriceListFile::new("noext", vec![]).extension(), None);
        assert_eq!(PriceListFile::new(".csv", vec![]).extension().as_deref(), Some("csv"));
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supplier.csv");
        tokio::fs::write(&path, b"name;price\n").await.unwrap();

        let file = PriceListFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "supplier.csv");
        assert_eq!(file.bytes, b"name;price\n");
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = PriceListFile::from_path(dir.path().join("absent.csv")).await.unwrap_err();
        assert!(matches!(err, ReviewError::IoError(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
