//! Filter selection to results query mapping

use shared::{FilterSelection, ResultStatus};

/// Query parameters for the results endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultsQuery {
    pub status: Option<ResultStatus>,
}

impl ResultsQuery {
    /// Parameters to append to the request, empty for "all"
    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.status
            .map(|status| vec![("status", status.as_str().to_string())])
            .unwrap_or_default()
    }
}

pub fn build_query(filter: FilterSelection) -> ResultsQuery {
    let status = match filter {
        FilterSelection::All => None,
        FilterSelection::Matched => Some(ResultStatus::Matched),
        FilterSelection::Unmatched => Some(ResultStatus::Unmatched),
    };
    ResultsQuery { status }
}
