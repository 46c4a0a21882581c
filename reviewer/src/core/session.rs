//! Manual match session state machine
//!
//! One session resolves one record: it seeds a search from the record name,
//! keeps only the latest search response, and commits the operator's choice.
//! States move `Open -> Committing -> Committed`, or `Open -> Cancelled`; a
//! failed commit returns to `Open` so the operator can pick again.

use shared::{MasterCatalogEntry, MasterEntryId, RecordId, ReconciliationRecord, SessionId};

use crate::error::{ReviewResult, ValidationError};
use crate::types::Generation;

/// Number of leading name tokens used as the first search query
pub const SEED_TOKENS: usize = 3;

/// First whitespace-delimited tokens of a supplier item name
pub fn seed_query(name: &str) -> String {
    name.split_whitespace()
        .take(SEED_TOKENS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Committing { master_id: MasterEntryId },
    Committed { master_id: MasterEntryId },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub session: SessionId,
    pub generation: Generation,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitTicket {
    pub session: SessionId,
    pub record_id: RecordId,
    pub master_id: MasterEntryId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { count: usize },
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed {
        record_id: RecordId,
        master_id: MasterEntryId,
    },
    Discarded,
}

#[derive(Debug)]
pub struct ManualMatchSession {
    id: SessionId,
    record: ReconciliationRecord,
    query: String,
    results: Vec<MasterCatalogEntry>,
    searching: bool,
    latest_search: Generation,
    state: SessionState,
}

impl ManualMatchSession {
    /// Open a session and issue the seeded search when the seed is not blank
    pub fn open(record: ReconciliationRecord) -> (Self, Option<SearchTicket>) {
        let seed = seed_query(&record.name);
        let mut session = Self {
            id: SessionId::new(),
            record,
            query: seed.clone(),
            results: Vec::new(),
            searching: false,
            latest_search: Generation::default(),
            state: SessionState::Open,
        };

        let ticket = session.search(&seed).ok();
        (session, ticket)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn record(&self) -> &ReconciliationRecord {
        &self.record
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[MasterCatalogEntry] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open | SessionState::Committing { .. })
    }

    /// Issue a search; a blank query changes nothing and is never sent
    pub fn search(&mut self, query: &str) -> ReviewResult<SearchTicket> {
        self.ensure_editable()?;

        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::BlankQuery.into());
        }

        self.query = query.to_string();
        self.latest_search = self.latest_search.next();
        self.searching = true;

        Ok(SearchTicket {
            session: self.id,
            generation: self.latest_search,
            query: self.query.clone(),
        })
    }

    /// Apply a search completion if it is the latest one issued
    pub fn complete_search(
        &mut self,
        generation: Generation,
        result: ReviewResult<Vec<MasterCatalogEntry>>,
    ) -> ReviewResult<SearchOutcome> {
        if !self.is_open() || generation != self.latest_search {
            return Ok(SearchOutcome::Discarded);
        }

        self.searching = false;
        let entries = result?;
        let count = entries.len();
        self.results = entries;
        Ok(SearchOutcome::Applied { count })
    }

    /// Start committing `master_id` as the match for this session's record
    pub fn begin_commit(&mut self, master_id: MasterEntryId) -> ReviewResult<CommitTicket> {
        self.ensure_editable()?;

        self.state = SessionState::Committing { master_id };
        Ok(CommitTicket {
            session: self.id,
            record_id: self.record.id,
            master_id,
        })
    }

    /// Apply the commit completion
    ///
    /// Success closes the session; failure reopens it with the result list
    /// untouched so the operator can select again.
    pub fn complete_commit(&mut self, result: ReviewResult<()>) -> ReviewResult<CommitOutcome> {
        let SessionState::Committing { master_id } = self.state else {
            return Ok(CommitOutcome::Discarded);
        };

        match result {
            Ok(()) => {
                self.state = SessionState::Committed { master_id };
                self.searching = false;
                Ok(CommitOutcome::Committed {
                    record_id: self.record.id,
                    master_id,
                })
            }
            Err(e) => {
                self.state = SessionState::Open;
                Err(e)
            }
        }
    }

    /// Abandon the session before committing
    pub fn cancel(&mut self) -> ReviewResult<()> {
        match self.state {
            SessionState::Open | SessionState::Cancelled => {
                self.state = SessionState::Cancelled;
                self.searching = false;
                Ok(())
            }
            SessionState::Committing { .. } => Err(ValidationError::CommitInFlight.into()),
            SessionState::Committed { .. } => Err(ValidationError::SessionClosed.into()),
        }
    }

    fn ensure_editable(&self) -> Result<(), ValidationError> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Committing { .. } => Err(ValidationError::CommitInFlight),
            SessionState::Committed { .. } | SessionState::Cancelled => Err(ValidationError::SessionClosed),
        }
    }
}
