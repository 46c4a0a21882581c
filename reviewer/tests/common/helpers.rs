//! Test helpers for reviewer tests
//!
//! Builders for configured reviewers and a hand-written service fake whose
//! result and search responses are held back until the test releases them.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use reviewer::core::ResultsQuery;
use reviewer::{
    MatchingService, MockMatchingService, Page, PriceListUpload, ReviewConfig, ReviewError,
    ReviewResult, ReviewUpdate, Reviewer,
};
use shared::{
    ExportFormat, MasterCatalogEntry, MasterEntryId, MatchRunSummary, RecordId,
    ReconciliationRecord, ResultStatus, UploadReceipt,
};

pub struct TestHelpers;

impl TestHelpers {
    pub const SHORT_TIMEOUT: Duration = Duration::from_millis(100);

    pub fn config() -> ReviewConfig {
        ReviewConfig::default().with_timeout(Duration::from_secs(5))
    }

    pub fn reviewer(service: MockMatchingService) -> Reviewer<MockMatchingService> {
        Reviewer::new(service, Self::config())
    }

    pub fn gated_reviewer(service: Arc<GatedResults>, timeout: Duration) -> Reviewer<GatedResults> {
        Reviewer::with_service(service, Self::config().with_timeout(timeout))
    }

    /// Wait for exactly one completion and apply it
    pub async fn next_update<S: MatchingService + 'static>(
        reviewer: &mut Reviewer<S>,
    ) -> ReviewResult<ReviewUpdate> {
        let event = reviewer.next_event().await.expect("a request should be in flight");
        reviewer.handle_event(event)
    }
}

struct Gate {
    status: Option<ResultStatus>,
    release: Arc<Notify>,
    records: Vec<ReconciliationRecord>,
}

struct SearchGate {
    query: String,
    release: Arc<Notify>,
    entries: Vec<MasterCatalogEntry>,
}

/// Service fake answering `list_results` per status filter and
/// `search_catalog` per query, only once the matching gate is opened
#[derive(Default)]
pub struct GatedResults {
    gates: Mutex<Vec<Gate>>,
    searches: Mutex<Vec<SearchGate>>,
}

impl GatedResults {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register the response for `status`; returns the handle that releases it
    pub fn respond(&self, status: Option<ResultStatus>, records: Vec<ReconciliationRecord>) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.gates.lock().unwrap().push(Gate {
            status,
            release: Arc::clone(&release),
            records,
        });
        release
    }

    /// Register the catalog entries returned for `query`
    pub fn respond_search(&self, query: &str, entries: Vec<MasterCatalogEntry>) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.searches.lock().unwrap().push(SearchGate {
            query: query.to_string(),
            release: Arc::clone(&release),
            entries,
        });
        release
    }

    fn unsupported<T>(operation: &'static str) -> ReviewResult<T> {
        Err(ReviewError::transport(operation, "not supported by this fake"))
    }
}

#[async_trait]
impl MatchingService for GatedResults {
    async fn list_results(&self, query: ResultsQuery) -> ReviewResult<Vec<ReconciliationRecord>> {
        let gate = {
            let gates = self.gates.lock().unwrap();
            gates
                .iter()
                .find(|gate| gate.status == query.status)
                .map(|gate| (Arc::clone(&gate.release), gate.records.clone()))
        };

        let Some((release, records)) = gate else {
            return Self::unsupported("list results");
        };
        release.notified().await;
        Ok(records)
    }

    async fn search_catalog(&self, query: String) -> ReviewResult<Vec<MasterCatalogEntry>> {
        let gate = {
            let searches = self.searches.lock().unwrap();
            searches
                .iter()
                .find(|gate| gate.query == query)
                .map(|gate| (Arc::clone(&gate.release), gate.entries.clone()))
        };

        let Some((release, entries)) = gate else {
            return Self::unsupported("catalog search");
        };
        release.notified().await;
        Ok(entries)
    }

    async fn upload_price_list(&self, _upload: PriceListUpload) -> ReviewResult<UploadReceipt> {
        Self::unsupported("price list upload")
    }

    async fn trigger_match(&self) -> ReviewResult<MatchRunSummary> {
        Self::unsupported("automatic match")
    }

    async fn commit_manual_match(&self, _record_id: RecordId, _master_id: MasterEntryId) -> ReviewResult<()> {
        Self::unsupported("manual match")
    }

    async fn export(&self, _format: ExportFormat) -> ReviewResult<Vec<u8>> {
        Self::unsupported("export")
    }

    async fn list_master_items(&self, _page: Page) -> ReviewResult<Vec<MasterCatalogEntry>> {
        Self::unsupported("master catalog listing")
    }
}
