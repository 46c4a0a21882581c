//! Reconciliation records and master catalog entries
//!
//! Records arrive as [`RecordPayload`] and are validated into
//! [`ReconciliationRecord`]; after validation a matched record always carries
//! a confidence, a match type and its master catalog entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MasterEntryId, RecordId};
use crate::errors::{SharedError, SharedResult};
use crate::messages::RecordPayload;

/// Match certainty in 0..=100 as the matcher reported it, where exactly 100
/// is an exact match
///
/// Fuzzy scores are fractional (`85.71428571428571`); the value is kept as
/// received and only rounded down when displayed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    pub const EXACT: Confidence = Confidence(100.0);

    pub fn new(value: u8) -> SharedResult<Self> {
        Self::try_from(f64::from(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_exact(self) -> bool {
        self.0 == 100.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = SharedError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(SharedError::InvalidConfidence { value });
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            return write!(f, "{}%", self.0);
        }
        // Round down so 99.96 never reads as 100
        let shown = (self.0 * 10.0).floor() / 10.0;
        write!(f, "{shown:.1}%")
    }
}

/// Mechanism that produced a match
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    Barcode,
    Article,
    Fuzzy,
    Manual,
    /// Any label the matcher reports that this client does not know about
    Other(String),
}

impl MatchType {
    pub fn as_str(&self) -> &str {
        match self {
            MatchType::Barcode => "barcode",
            MatchType::Article => "article",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Manual => "manual",
            MatchType::Other(label) => label,
        }
    }
}

impl From<&str> for MatchType {
    fn from(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "barcode" => MatchType::Barcode,
            "article" => MatchType::Article,
            "fuzzy" => MatchType::Fuzzy,
            "manual" => MatchType::Manual,
            _ => MatchType::Other(label.to_string()),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical product record of the master catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCatalogEntry {
    pub id: MasterEntryId,
    pub name: String,
    /// Catalog code used to identify the item on export
    #[serde(rename = "code_1c", alias = "code")]
    pub code: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
}

/// Link between a record and the catalog entry it resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch {
    pub confidence: Confidence,
    pub match_type: MatchType,
    pub master_item: MasterCatalogEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Unmatched,
    Matched(CatalogMatch),
}

/// One supplier line item and its resolution state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordPayload", into = "RecordPayload")]
pub struct ReconciliationRecord {
    pub id: RecordId,
    pub supplier_name: Option<String>,
    pub name: String,
    pub barcode: Option<String>,
    pub article: Option<String>,
    pub price: Option<f64>,
    pub resolution: Resolution,
}

impl ReconciliationRecord {
    pub fn is_matched(&self) -> bool {
        matches!(self.resolution, Resolution::Matched(_))
    }

    pub fn catalog_match(&self) -> Option<&CatalogMatch> {
        match &self.resolution {
            Resolution::Matched(m) => Some(m),
            Resolution::Unmatched => None,
        }
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.catalog_match().map(|m| m.confidence)
    }

    pub fn match_type(&self) -> Option<&MatchType> {
        self.catalog_match().map(|m| &m.match_type)
    }

    pub fn master_item(&self) -> Option<&MasterCatalogEntry> {
        self.catalog_match().map(|m| &m.master_item)
    }
}

impl TryFrom<RecordPayload> for ReconciliationRecord {
    type Error = SharedError;

    fn try_from(payload: RecordPayload) -> Result<Self, Self::Error> {
        let id = payload.id;

        // Confidence, type and master item of an unmatched record are never displayed
        let resolution = if payload.is_matched {
            let raw = payload
                .match_confidence
                .ok_or_else(|| SharedError::contract(id, "matched record has no confidence"))?;
            let confidence =
                Confidence::try_from(raw).map_err(|e| SharedError::contract(id, e.to_string()))?;
            let match_type = payload
                .match_type
                .as_deref()
                .map(MatchType::from)
                .ok_or_else(|| SharedError::contract(id, "matched record has no match type"))?;
            let master_item = payload
                .master_item
                .ok_or_else(|| SharedError::contract(id, "matched record has no master item"))?;

            Resolution::Matched(CatalogMatch {
                confidence,
                match_type,
                master_item,
            })
        } else {
            Resolution::Unmatched
        };

        Ok(Self {
            id,
            supplier_name: payload.supplier_name,
            name: payload.name,
            barcode: payload.barcode,
            article: payload.article,
            price: payload.price,
            resolution,
        })
    }
}

impl From<ReconciliationRecord> for RecordPayload {
    fn from(record: ReconciliationRecord) -> Self {
        let (is_matched, match_confidence, match_type, master_item) = match record.resolution {
            Resolution::Unmatched => (false, None, None, None),
            Resolution::Matched(m) => (
                true,
                Some(m.confidence.value()),
                Some(m.match_type.as_str().to_string()),
                Some(m.master_item),
            ),
        };

        Self {
            id: record.id,
            supplier_name: record.supplier_name,
            name: record.name,
            barcode: record.barcode,
            article: record.article,
            price: record.price,
            is_matched,
            match_confidence,
            match_type,
            master_item,
        }
    }
}
