//! Review client for supplier price-list reconciliation
//!
//! Loads matching results from the matching service, classifies them for the
//! operator, lets the operator resolve records through manual match sessions,
//! and submits new price lists followed by an automatic matching pass. All
//! service I/O sits behind the [`MatchingService`] trait.

pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod reviewer;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::ReviewConfig;
pub use crate::core::{ManualMatchSession, MatchTier, ResultsStore, StoreSummary, UploadStaging};
pub use error::{ReviewError, ReviewResult, ValidationError};
pub use reviewer::Reviewer;
pub use services::RealMatchingService;
pub use traits::{MatchingService, MockMatchingService};
pub use types::{Generation, Page, PriceListFile, PriceListUpload, ReviewEvent, ReviewUpdate};
