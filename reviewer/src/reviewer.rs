//! Review controller
//!
//! Owns the results store, the open manual match session and the upload
//! staging. Requests run as spawned tasks bounded by the configured timeout;
//! their completions come back as [`ReviewEvent`]s on a channel and are
//! applied one at a time by [`Reviewer::handle_event`], so all state changes
//! happen on the caller's task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use shared::{
    logging, review_debug, review_info, review_warn, Component, ExportFormat, FilterSelection,
    MasterCatalogEntry, MasterEntryId, MatchRunSummary, RecordId, ReconciliationRecord, SessionId,
};

use crate::config::ReviewConfig;
use crate::core::session::{CommitOutcome, CommitTicket, ManualMatchSession, SearchOutcome, SearchTicket};
use crate::core::store::{RefreshOutcome, RefreshTicket, ResultsStore};
use crate::core::upload::UploadStaging;
use crate::error::{ReviewError, ReviewResult, ValidationError};
use crate::traits::MatchingService;
use crate::types::{Generation, Page, PriceListFile, PriceListUpload, ReviewEvent, ReviewUpdate};

pub struct Reviewer<S: MatchingService + 'static> {
    service: Arc<S>,
    config: ReviewConfig,
    store: ResultsStore,
    session: Option<ManualMatchSession>,
    staging: UploadStaging,
    events_tx: mpsc::UnboundedSender<ReviewEvent>,
    events_rx: mpsc::UnboundedReceiver<ReviewEvent>,
    pending: usize,
}

impl<S: MatchingService + 'static> Reviewer<S> {
    pub fn new(service: S, config: ReviewConfig) -> Self {
        Self::with_service(Arc::new(service), config)
    }

    pub fn with_service(service: Arc<S>, config: ReviewConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            service,
            config,
            store: ResultsStore::new(),
            session: None,
            staging: UploadStaging::new(),
            events_tx,
            events_rx,
            pending: 0,
        }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn store(&self) -> &ResultsStore {
        &self.store
    }

    pub fn session(&self) -> Option<&ManualMatchSession> {
        self.session.as_ref()
    }

    pub fn staging(&self) -> &UploadStaging {
        &self.staging
    }

    /// Requests dispatched whose completion has not been received yet
    pub fn pending(&self) -> usize {
        self.pending
    }

    // ---- results store -------------------------------------------------

    /// Data-changed signal: refetch with the current filter
    pub fn refresh(&mut self) -> Generation {
        let ticket = self.store.request_refresh();
        self.dispatch_refresh(ticket)
    }

    /// Change the filter and refetch
    pub fn set_filter(&mut self, filter: FilterSelection) -> Generation {
        let ticket = self.store.begin_refresh(filter);
        self.dispatch_refresh(ticket)
    }

    fn dispatch_refresh(&mut self, ticket: RefreshTicket) -> Generation {
        review_debug!(
            Component::Store,
            generation = ticket.generation.value(),
            filter = %ticket.filter,
            "Dispatching results refresh"
        );

        let RefreshTicket { generation, query, .. } = ticket;
        let service = Arc::clone(&self.service);
        let limit = self.config.request_timeout;

        self.spawn(async move {
            let result = bounded("list results", limit, service.list_results(query)).await;
            ReviewEvent::ResultsLoaded { generation, result }
        });
        generation
    }

    // ---- manual match session --------------------------------------------

    /// Open a session for a loaded record, replacing any open session
    pub fn open_session(&mut self, record_id: RecordId) -> ReviewResult<SessionId> {
        let record = self
            .store
            .find(record_id)
            .cloned()
            .ok_or(ValidationError::RecordNotLoaded { record_id })?;
        self.open_session_for(record)
    }

    /// Open a session for a record obtained elsewhere
    pub fn open_session_for(&mut self, record: ReconciliationRecord) -> ReviewResult<SessionId> {
        if let Some(current) = self.session.as_mut() {
            // Leaving a session abandons it; its late completions no longer match
            current.cancel()?;
        }

        let (session, seed) = ManualMatchSession::open(record);
        let id = session.id();
        review_info!(
            Component::Session,
            session = %id,
            record_id = %session.record().id,
            seed = %session.query(),
            "Opened manual match session"
        );

        self.session = Some(session);
        if let Some(ticket) = seed {
            self.dispatch_search(ticket);
        }
        Ok(id)
    }

    /// Search the catalog from the open session
    pub fn search(&mut self, query: &str) -> ReviewResult<Generation> {
        let session = self.session.as_mut().ok_or(ValidationError::NoSession)?;
        let ticket = session.search(query)?;
        Ok(self.dispatch_search(ticket))
    }

    fn dispatch_search(&mut self, ticket: SearchTicket) -> Generation {
        let SearchTicket {
            session,
            generation,
            query,
        } = ticket;
        review_debug!(Component::Session, session = %session, generation = generation.value(), query = %query, "Dispatching catalog search");

        let service = Arc::clone(&self.service);
        let limit = self.config.request_timeout;
        self.spawn(async move {
            let result = bounded("catalog search", limit, service.search_catalog(query)).await;
            ReviewEvent::SearchFinished {
                session,
                generation,
                result,
            }
        });
        generation
    }

    /// Commit the operator's choice for the open session's record
    pub fn select_and_commit(&mut self, master_id: MasterEntryId) -> ReviewResult<()> {
        let session = self.session.as_mut().ok_or(ValidationError::NoSession)?;
        let ticket = session.begin_commit(master_id)?;
        self.dispatch_commit(ticket);
        Ok(())
    }

    fn dispatch_commit(&mut self, ticket: CommitTicket) {
        let CommitTicket {
            session,
            record_id,
            master_id,
        } = ticket;
        review_info!(Component::Session, record_id = %record_id, master_id = %master_id, "Committing manual match");

        let service = Arc::clone(&self.service);
        let limit = self.config.request_timeout;
        self.spawn(async move {
            let result = bounded(
                "manual match",
                limit,
                service.commit_manual_match(record_id, master_id),
            )
            .await;
            ReviewEvent::CommitFinished { session, result }
        });
    }

    /// Abandon the open session; a no-op when none is open
    pub fn cancel_session(&mut self) -> ReviewResult<()> {
        if let Some(session) = self.session.as_mut() {
            session.cancel()?;
            review_debug!(Component::Session, session = %session.id(), "Cancelled manual match session");
        }
        self.session = None;
        Ok(())
    }

    // ---- upload and trigger ----------------------------------------------

    pub fn stage_file(&mut self, file: PriceListFile) -> ReviewResult<()> {
        Ok(self.staging.stage_file(file)?)
    }

    pub fn set_supplier_name(&mut self, name: impl Into<String>) {
        self.staging.set_supplier_name(name);
    }

    /// Validate locally, then upload and trigger matching as one unit
    pub fn submit_upload(&mut self) -> ReviewResult<()> {
        let upload = self.staging.begin_submit()?;
        logging::log_progress(
            Component::Uploader,
            "Submitting price list",
            &format!("{} from {}", upload.file.file_name, upload.supplier_name),
        );

        let service = Arc::clone(&self.service);
        let limit = self.config.request_timeout;
        self.spawn(async move {
            let result = run_submission(service.as_ref(), upload, limit).await;
            ReviewEvent::SubmissionFinished { result }
        });
        Ok(())
    }

    // ---- one-shot requests -----------------------------------------------

    /// Catalog search outside any session
    pub async fn search_catalog(&self, query: &str) -> ReviewResult<Vec<MasterCatalogEntry>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::BlankQuery.into());
        }
        bounded(
            "catalog search",
            self.config.request_timeout,
            self.service.search_catalog(query.to_string()),
        )
        .await
    }

    pub async fn export(&self, format: ExportFormat) -> ReviewResult<Vec<u8>> {
        let bytes = bounded("export", self.config.request_timeout, self.service.export(format)).await?;
        review_info!(Component::Client, format = %format, bytes = bytes.len(), "Downloaded export");
        Ok(bytes)
    }

    pub async fn list_master_items(&self, page: Page) -> ReviewResult<Vec<MasterCatalogEntry>> {
        bounded(
            "master catalog listing",
            self.config.request_timeout,
            self.service.list_master_items(page),
        )
        .await
    }

    // ---- completions -----------------------------------------------------

    /// Wait for the next completion; `None` once nothing is in flight
    pub async fn next_event(&mut self) -> Option<ReviewEvent> {
        if self.pending == 0 {
            return None;
        }
        let event = self.events_rx.recv().await;
        if event.is_some() {
            self.pending -= 1;
        }
        event
    }

    /// Apply one completion to the store, the session or the staging area
    pub fn handle_event(&mut self, event: ReviewEvent) -> ReviewResult<ReviewUpdate> {
        match event {
            ReviewEvent::ResultsLoaded { generation, result } => self.apply_results(generation, result),
            ReviewEvent::SearchFinished {
                session,
                generation,
                result,
            } => {
                let Some(current) = self.current_session(session) else {
                    review_debug!(Component::Session, session = %session, "Discarded search for closed session");
                    return Ok(ReviewUpdate::Discarded);
                };
                match current.complete_search(generation, result)? {
                    SearchOutcome::Applied { count } => Ok(ReviewUpdate::SearchResultsApplied { count }),
                    SearchOutcome::Discarded => {
                        review_debug!(Component::Session, generation = generation.value(), "Discarded superseded search");
                        Ok(ReviewUpdate::Discarded)
                    }
                }
            }
            ReviewEvent::CommitFinished { session, result } => {
                let Some(current) = self.current_session(session) else {
                    return Ok(ReviewUpdate::Discarded);
                };
                match current.complete_commit(result) {
                    Ok(CommitOutcome::Committed { record_id, master_id }) => {
                        logging::log_success(
                            Component::Session,
                            &format!("Record {record_id} matched to catalog entry {master_id}"),
                        );
                        self.session = None;
                        self.refresh();
                        Ok(ReviewUpdate::MatchCommitted { record_id, master_id })
                    }
                    Ok(CommitOutcome::Discarded) => Ok(ReviewUpdate::Discarded),
                    Err(e @ ReviewError::CommitConflict { .. }) => {
                        // The operator can pick another entry; the session stays open
                        review_warn!(Component::Session, error = %e, "Manual match rejected");
                        Err(e)
                    }
                    Err(e) => {
                        logging::log_error(Component::Session, "Manual match", &e);
                        Err(e)
                    }
                }
            }
            ReviewEvent::SubmissionFinished { result } => {
                self.staging.finish_submit(result.is_ok());
                match result {
                    Ok(summary) => {
                        logging::log_success(
                            Component::Uploader,
                            &format!("Matched {} items, {} remaining", summary.matched, summary.remaining),
                        );
                        self.refresh();
                        Ok(ReviewUpdate::SubmissionCompleted { summary })
                    }
                    Err(e) => {
                        logging::log_error(Component::Uploader, "Price list submission", &e);
                        Err(e)
                    }
                }
            }
        }
    }

    /// Drain completions until nothing is in flight, including requests
    /// dispatched while handling them
    pub async fn settle(&mut self) -> Vec<ReviewResult<ReviewUpdate>> {
        let mut updates = Vec::new();
        while let Some(event) = self.next_event().await {
            updates.push(self.handle_event(event));
        }
        updates
    }

    fn apply_results(
        &mut self,
        generation: Generation,
        result: ReviewResult<Vec<ReconciliationRecord>>,
    ) -> ReviewResult<ReviewUpdate> {
        match self.store.complete_refresh(generation, result) {
            Ok(RefreshOutcome::Applied { count }) => {
                review_info!(Component::Store, generation = generation.value(), count, "Applied results");
                Ok(ReviewUpdate::RecordsApplied { count })
            }
            Ok(RefreshOutcome::Discarded { generation, current }) => {
                review_debug!(
                    Component::Store,
                    generation = generation.value(),
                    current = current.value(),
                    "Discarded stale results"
                );
                Ok(ReviewUpdate::Discarded)
            }
            Err(e) => {
                logging::log_error(Component::Store, "Results refresh", &e);
                Err(e)
            }
        }
    }

    fn current_session(&mut self, id: SessionId) -> Option<&mut ManualMatchSession> {
        self.session.as_mut().filter(|session| session.id() == id)
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ReviewEvent> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the reviewer
            let _ = tx.send(task.await);
        });
    }
}

/// Upload then trigger matching; the trigger only runs after a stored upload
pub async fn run_submission<S>(
    service: &S,
    upload: PriceListUpload,
    limit: Duration,
) -> ReviewResult<MatchRunSummary>
where
    S: MatchingService + ?Sized,
{
    let receipt = bounded("price list upload", limit, service.upload_price_list(upload)).await?;
    review_info!(Component::Uploader, message = %receipt.message, "Price list stored");

    bounded("automatic match", limit, service.trigger_match())
        .await
        .map_err(|source| ReviewError::MatchTriggerFailed {
            upload_message: receipt.message,
            source: Box::new(source),
        })
}

/// Surface an overrun as an ordinary failure instead of leaving it pending
async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> ReviewResult<T>
where
    F: Future<Output = ReviewResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ReviewError::Timeout {
            operation,
            after: limit,
        }),
    }
}
