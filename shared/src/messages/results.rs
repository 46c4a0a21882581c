//! Results endpoint payloads

use serde::{Deserialize, Serialize};

use crate::types::{MasterCatalogEntry, RecordId};

/// Reconciliation record exactly as the results endpoint returns it
///
/// No invariants are enforced here; convert into
/// [`ReconciliationRecord`](crate::types::ReconciliationRecord) to validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub id: RecordId,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_matched: bool,
    #[serde(default)]
    pub match_confidence: Option<f64>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_item: Option<MasterCatalogEntry>,
}
