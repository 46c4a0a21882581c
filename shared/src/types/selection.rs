//! Operator selections: result filter and export format

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SharedError;

/// Which records the operator wants to see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSelection {
    #[default]
    All,
    Matched,
    Unmatched,
}

impl FilterSelection {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterSelection::All => "all",
            FilterSelection::Matched => "matched",
            FilterSelection::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterSelection {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterSelection::All),
            "matched" => Ok(FilterSelection::Matched),
            "unmatched" => Ok(FilterSelection::Unmatched),
            _ => Err(SharedError::UnknownFilter { input: s.to_string() }),
        }
    }
}

/// Value of the `status` parameter of the results endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Matched,
    Unmatched,
}

impl ResultStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::Matched => "matched",
            ResultStatus::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog-ready export file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xml,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
        }
    }

    /// File name the server suggests for downloads
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "export_1c.csv",
            ExportFormat::Xml => "export_1c.xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            _ => Err(SharedError::UnknownExportFormat { input: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing_fails_fast() {
        assert_eq!("matched".parse::<FilterSelection>(), Ok(FilterSelection::Matched));
        assert_eq!("ALL".parse::<FilterSelection>(), Ok(FilterSelection::All));
        assert_eq!(
            "pending".parse::<FilterSelection>(),
            Err(SharedError::UnknownFilter { input: "pending".to_string() })
        );
    }

    #[test]
    fn test_filter_defaults_to_all() {
        assert_eq!(FilterSelection::default(), FilterSelection::All);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("xml".parse::<ExportFormat>(), Ok(ExportFormat::Xml));
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.default_file_name(), "export_1c.csv");
    }
}
