//! Test fixtures and data for reviewer tests
//!
//! Consistent records, catalog entries and wire payloads used across suites.

use serde_json::{json, Value};

use reviewer::PriceListFile;
use shared::{
    CatalogMatch, Confidence, MasterCatalogEntry, MasterEntryId, MatchRunSummary, MatchType,
    RecordId, ReconciliationRecord, Resolution, UploadReceipt,
};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SUPPLIER: &'static str = "ООО Ромашка";
    pub const BOLT_NAME: &'static str = "Стальной болт М8 оцинкованный 50шт";
    pub const BOLT_SEED: &'static str = "Стальной болт М8";

    pub const BOLT_ID: RecordId = RecordId(7);
    pub const NUT_ID: RecordId = RecordId(8);
    pub const CATALOG_BOLT_ID: MasterEntryId = MasterEntryId(501);

    pub fn catalog_entry(id: i64, name: &str) -> MasterCatalogEntry {
        MasterCatalogEntry {
            id: MasterEntryId(id),
            name: name.to_string(),
            code: format!("{id:010}"),
            barcode: None,
            article: None,
        }
    }

    pub fn catalog_bolt() -> MasterCatalogEntry {
        Self::catalog_entry(Self::CATALOG_BOLT_ID.0, "Болт М8х50 оцинк.")
    }

    /// Unmatched supplier item awaiting manual review
    pub fn unmatched_bolt() -> ReconciliationRecord {
        ReconciliationRecord {
            id: Self::BOLT_ID,
            supplier_name: Some(Self::SUPPLIER.to_string()),
            name: Self::BOLT_NAME.to_string(),
            barcode: None,
            article: Some("B-850".to_string()),
            price: Some(12.5),
            resolution: Resolution::Unmatched,
        }
    }

    /// The bolt after the operator linked it to the catalog entry
    pub fn manually_matched_bolt() -> ReconciliationRecord {
        ReconciliationRecord {
            resolution: Resolution::Matched(CatalogMatch {
                confidence: Confidence::EXACT,
                match_type: MatchType::Manual,
                master_item: Self::catalog_bolt(),
            }),
            ..Self::unmatched_bolt()
        }
    }

    pub fn fuzzy_nut(confidence: u8) -> ReconciliationRecord {
        ReconciliationRecord {
            id: Self::NUT_ID,
            supplier_name: Some(Self::SUPPLIER.to_string()),
            name: "Гайка М8 DIN 934".to_string(),
            barcode: Some("4601234567890".to_string()),
            article: None,
            price: Some(3.2),
            resolution: Resolution::Matched(CatalogMatch {
                confidence: Confidence::new(confidence).unwrap(),
                match_type: MatchType::Fuzzy,
                master_item: Self::catalog_entry(502, "Гайка М8 оцинк."),
            }),
        }
    }

    pub fn price_list() -> PriceListFile {
        PriceListFile::new("romashka_2024.csv", "name;price\nБолт М8;12.5\n".as_bytes().to_vec())
    }

    pub fn upload_receipt() -> UploadReceipt {
        UploadReceipt {
            message: "File uploaded, 2 items added".to_string(),
        }
    }

    pub fn match_summary() -> MatchRunSummary {
        MatchRunSummary {
            message: "Matching run completed".to_string(),
            matched: 1,
            remaining: 1,
        }
    }

    /// Results endpoint body: one unmatched and one fuzzy-matched record
    pub fn results_json() -> Value {
        json!([
            {
                "id": 7,
                "supplier_name": Self::SUPPLIER,
                "name": Self::BOLT_NAME,
                "barcode": null,
                "article": "B-850",
                "price": 12.5,
                "is_matched": false,
                "match_confidence": null,
                "match_type": null
            },
            {
                "id": 8,
                "supplier_name": Self::SUPPLIER,
                "name": "Гайка М8 DIN 934",
                "barcode": "4601234567890",
                "article": null,
                "price": 3.2,
                "is_matched": true,
                "match_confidence": 85.0,
                "match_type": "fuzzy",
                "master_item": {
                    "id": 502,
                    "name": "Гайка М8 оцинк.",
                    "code_1c": "0000000502",
                    "barcode": null,
                    "article": null
                }
            }
        ])
    }

    /// Fuzzy matcher output: the score is a raw ratio, not a whole number
    pub fn fuzzy_score_json() -> Value {
        json!([
            {
                "id": 1,
                "name": "Шайба М8 плоская",
                "is_matched": false
            },
            {
                "id": 2,
                "name": "Шайба М8 DIN 125",
                "is_matched": true,
                "match_confidence": 85.71428571428571,
                "match_type": "fuzzy",
                "master_item": {
                    "id": 503,
                    "name": "Шайба М8 оцинк.",
                    "code_1c": "0000000503"
                }
            }
        ])
    }

    /// A matched record without a confidence breaks the data contract
    pub fn contract_violation_json() -> Value {
        json!([
            {
                "id": 9,
                "name": "Шайба М8",
                "is_matched": true,
                "match_confidence": null,
                "match_type": "fuzzy",
                "master_item": {
                    "id": 503,
                    "name": "Шайба М8",
                    "code_1c": "0000000503"
                }
            }
        ])
    }

    pub fn catalog_json() -> Value {
        json!([
            {
                "id": 501,
                "name": "Болт М8х50 оцинк.",
                "code_1c": "0000000501",
                "barcode": null,
                "article": "B-850"
            }
        ])
    }
}
