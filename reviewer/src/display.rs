//! Plain-text rendering for the command line

use shared::{FilterSelection, MasterCatalogEntry, ReconciliationRecord};

use crate::core::classifier::{classify, needs_attention, review_action};
use crate::core::store::StoreSummary;

const ATTENTION_MARK: &str = "!";

/// One results table row: marker, id, supplier item, catalog entry, tier, action
pub fn record_row(record: &ReconciliationRecord, attention_threshold: u8) -> String {
    let marker = if needs_attention(record, attention_threshold) {
        ATTENTION_MARK
    } else {
        " "
    };

    let catalog = match record.master_item() {
        Some(entry) => format!("{} [{}]", entry.name, entry.code),
        None => "-".to_string(),
    };

    format!(
        "{marker} {:>6}  {}{}  ->  {catalog}  |  {}  |  {}",
        record.id,
        record.name,
        identifiers(record.barcode.as_deref(), record.article.as_deref()),
        classify(record),
        review_action(record).label(),
    )
}

/// Catalog entry line; `position` is the 1-based pick number when listing candidates
pub fn catalog_row(position: Option<usize>, entry: &MasterCatalogEntry) -> String {
    let prefix = match position {
        Some(n) => format!("{n:>3}. "),
        None => String::new(),
    };
    format!(
        "{prefix}{} [{}] {}{}",
        entry.id,
        entry.code,
        entry.name,
        identifiers(entry.barcode.as_deref(), entry.article.as_deref()),
    )
}

pub fn summary_line(summary: &StoreSummary) -> String {
    format!(
        "{} records: {} exact, {} approximate, {} unmatched, {} need attention",
        summary.total, summary.exact, summary.approximate, summary.unmatched, summary.needs_attention
    )
}

/// Filter selector with counts; counts are only known for the loaded set
pub fn filter_options(active: FilterSelection, summary: &StoreSummary) -> String {
    [
        (FilterSelection::All, "All", summary.total),
        (FilterSelection::Matched, "Matched", summary.exact + summary.approximate),
        (FilterSelection::Unmatched, "Unmatched", summary.unmatched),
    ]
    .iter()
    .map(|(filter, label, count)| {
        if *filter == active {
            format!("[{label} ({count})]")
        } else {
            format!("{label} ({count})")
        }
    })
    .collect::<Vec<_>>()
    .join("  ")
}

fn identifiers(barcode: Option<&str>, article: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(barcode) = barcode.filter(|b| !b.is_empty()) {
        parts.push(format!("barcode {barcode}"));
    }
    if let Some(article) = article.filter(|a| !a.is_empty()) {
        parts.push(format!("article {article}"));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CatalogMatch, Confidence, MasterEntryId, MatchType, RecordId, Resolution};

    fn entry() -> MasterCatalogEntry {
        MasterCatalogEntry {
            id: MasterEntryId(501),
            name: "Болт М8х40 оцинк.".to_string(),
            code: "0000000123".to_string(),
            barcode: Some("4601234567890".to_string()),
            article: None,
        }
    }

    fn record(resolution: Resolution) -> ReconciliationRecord {
        ReconciliationRecord {
            id: RecordId(12),
            supplier_name: Some("ООО Ромашка".to_string()),
            name: "Болт М8 40мм".to_string(),
            barcode: None,
            article: Some("B-840".to_string()),
            price: Some(12.5),
            resolution,
        }
    }

    #[test]
    fn test_unmatched_row_is_flagged_with_find_action() {
        let row = record_row(&record(Resolution::Unmatched), 90);
        assert!(row.starts_with('!'));
        assert!(row.contains("Болт М8 40мм (article B-840)"));
        assert!(row.contains("No match"));
        assert!(row.ends_with("Find"));
    }

    #[test]
    fn test_exact_row_is_not_flagged() {
        let row = record_row(
            &record(Resolution::Matched(CatalogMatch {
                confidence: Confidence::EXACT,
                match_type: MatchType::Barcode,
                master_item: entry(),
            })),
            90,
        );
        assert!(row.starts_with(' '));
        assert!(row.contains("Болт М8х40 оцинк. [0000000123]"));
        assert!(row.contains("Exact (barcode)"));
        assert!(row.ends_with("Change"));
    }

    #[test]
    fn test_catalog_row_numbering() {
        assert_eq!(
            catalog_row(Some(2), &entry()),
            "  2. 501 [0000000123] Болт М8х40 оцинк. (barcode 4601234567890)"
        );
        assert!(catalog_row(None, &entry()).starts_with("501 "));
    }

    #[test]
    fn test_filter_options_mark_active_selection() {
        let summary = StoreSummary {
            total: 5,
            exact: 2,
            approximate: 1,
            unmatched: 2,
            needs_attention: 3,
        };
        assert_eq!(
            filter_options(FilterSelection::Unmatched, &summary),
            "All (5)  Matched (3)  [Unmatched (2)]"
        );
        assert_eq!(
            summary_line(&summary),
            "5 records: 2 exact, 1 approximate, 2 unmatched, 3 need attention"
        );
    }
}
