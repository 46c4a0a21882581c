//! Service trait definitions for dependency injection
//!
//! The matching service owns parsing, scoring, storage and export. Every call
//! to it goes through this trait so the review workflow can be tested
//! against mocks.

use async_trait::async_trait;

use shared::{
    ExportFormat, MasterCatalogEntry, MasterEntryId, MatchRunSummary, ReconciliationRecord,
    RecordId, UploadReceipt,
};

use crate::core::filter::ResultsQuery;
use crate::error::ReviewResult;
use crate::types::{Page, PriceListUpload};

/// Request/response contract of the external matching service
#[mockall::automock]
#[async_trait]
pub trait MatchingService: Send + Sync {
    /// List reconciliation records, optionally filtered by match status
    async fn list_results(&self, query: ResultsQuery) -> ReviewResult<Vec<ReconciliationRecord>>;

    /// Free-text search over the master catalog; callers never send a blank query
    async fn search_catalog(&self, query: String) -> ReviewResult<Vec<MasterCatalogEntry>>;

    /// Store a supplier price list
    async fn upload_price_list(&self, upload: PriceListUpload) -> ReviewResult<UploadReceipt>;

    /// Run the automatic matching pass over unmatched records
    async fn trigger_match(&self) -> ReviewResult<MatchRunSummary>;

    /// Link a record to a catalog entry chosen by the operator
    async fn commit_manual_match(&self, record_id: RecordId, master_id: MasterEntryId) -> ReviewResult<()>;

    /// Download the catalog-ready export of matched records
    async fn export(&self, format: ExportFormat) -> ReviewResult<Vec<u8>>;

    /// Page through the master catalog
    async fn list_master_items(&self, page: Page) -> ReviewResult<Vec<MasterCatalogEntry>>;
}
