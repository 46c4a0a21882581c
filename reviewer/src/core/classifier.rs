//! Result classification into presentation tiers
//!
//! Pure functions only: records are assumed to have passed contract
//! validation when they were decoded.

use std::fmt;

use shared::{Confidence, MatchType, ReconciliationRecord, Resolution};

/// Records at or above this confidence are not highlighted for review
pub const DEFAULT_ATTENTION_THRESHOLD: u8 = 90;

/// User-facing match quality of one record
#[derive(Debug, Clone, PartialEq)]
pub enum MatchTier {
    Unmatched,
    Exact { match_type: MatchType },
    Approximate { confidence: Confidence },
}

impl MatchTier {
    pub fn label(&self) -> String {
        match self {
            MatchTier::Unmatched => "No match".to_string(),
            MatchTier::Exact { match_type } => format!("Exact ({match_type})"),
            MatchTier::Approximate { confidence } => format!("Approximate ({confidence})"),
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Classify a record. Confidence 100 is the only exact signal.
pub fn classify(record: &ReconciliationRecord) -> MatchTier {
    match &record.resolution {
        Resolution::Unmatched => MatchTier::Unmatched,
        Resolution::Matched(m) if m.confidence.is_exact() => MatchTier::Exact {
            match_type: m.match_type.clone(),
        },
        Resolution::Matched(m) => MatchTier::Approximate {
            confidence: m.confidence,
        },
    }
}

/// Action offered to the operator for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Look for a catalog entry for an unmatched record
    Find,
    /// Replace the current match
    Change,
}

impl ReviewAction {
    pub fn label(self) -> &'static str {
        match self {
            ReviewAction::Find => "Find",
            ReviewAction::Change => "Change",
        }
    }
}

pub fn review_action(record: &ReconciliationRecord) -> ReviewAction {
    if record.is_matched() {
        ReviewAction::Change
    } else {
        ReviewAction::Find
    }
}

/// Unmatched records and matches below `threshold` need the operator's eye
pub fn needs_attention(record: &ReconciliationRecord, threshold: u8) -> bool {
    match record.confidence() {
        None => true,
        Some(confidence) => confidence.value() < f64::from(threshold),
    }
}
