//! Results store: the displayed record set and its refresh pipeline
//!
//! Pure state machine. Every refresh bumps the generation; a completion is
//! applied only when it carries the generation that is still current, so a
//! slow earlier request can never overwrite a later one.

use shared::{FilterSelection, RecordId, ReconciliationRecord};

use crate::core::classifier::{classify, needs_attention, MatchTier};
use crate::core::filter::{build_query, ResultsQuery};
use crate::error::ReviewResult;
use crate::types::Generation;

/// Request the store wants issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: Generation,
    pub filter: FilterSelection,
    pub query: ResultsQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// The response belonged to a superseded refresh
    Discarded { generation: Generation, current: Generation },
}

/// Per-tier counts of the loaded records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub total: usize,
    pub exact: usize,
    pub approximate: usize,
    pub unmatched: usize,
    pub needs_attention: usize,
}

#[derive(Debug, Default)]
pub struct ResultsStore {
    records: Vec<ReconciliationRecord>,
    loading: bool,
    filter: FilterSelection,
    generation: Generation,
}

impl ResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ReconciliationRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filter(&self) -> FilterSelection {
        self.filter
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn find(&self, id: RecordId) -> Option<&ReconciliationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Start a refresh for `filter`, superseding any refresh in flight
    pub fn begin_refresh(&mut self, filter: FilterSelection) -> RefreshTicket {
        self.filter = filter;
        self.generation = self.generation.next();
        self.loading = true;

        RefreshTicket {
            generation: self.generation,
            filter,
            query: build_query(filter),
        }
    }

    /// Data-changed signal: refresh with the current filter
    pub fn request_refresh(&mut self) -> RefreshTicket {
        self.begin_refresh(self.filter)
    }

    /// Apply the completion of the refresh issued as `generation`
    ///
    /// Stale completions are discarded without touching state, whether they
    /// succeeded or failed. A current failure stops loading and keeps the
    /// last known-good records.
    pub fn complete_refresh(
        &mut self,
        generation: Generation,
        result: ReviewResult<Vec<ReconciliationRecord>>,
    ) -> ReviewResult<RefreshOutcome> {
        if generation != self.generation {
            return Ok(RefreshOutcome::Discarded {
                generation,
                current: self.generation,
            });
        }

        self.loading = false;
        let records = result?;
        let count = records.len();
        self.records = records;
        Ok(RefreshOutcome::Applied { count })
    }

    /// Records paired with their presentation tier
    pub fn classified(&self) -> impl Iterator<Item = (&ReconciliationRecord, MatchTier)> + '_ {
        self.records.iter().map(|record| (record, classify(record)))
    }

    pub fn summary(&self, attention_threshold: u8) -> StoreSummary {
        let mut summary = StoreSummary {
            total: self.records.len(),
            ..StoreSummary::default()
        };

        for (record, tier) in self.classified() {
            match tier {
                MatchTier::Exact { .. } => summary.exact += 1,
                MatchTier::Approximate { .. } => summary.approximate += 1,
                MatchTier::Unmatched => summary.unmatched += 1,
            }
            if needs_attention(record, attention_threshold) {
                summary.needs_attention += 1;
            }
        }

        summary
    }
}
