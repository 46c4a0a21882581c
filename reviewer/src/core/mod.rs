//! Core review logic
//!
//! Pure state machines with no I/O dependencies. Requests are described by
//! tickets; completions are fed back in and either applied or discarded.

pub mod classifier;
pub mod filter;
pub mod session;
pub mod store;
pub mod upload;

pub use classifier::{classify, needs_attention, review_action, MatchTier, ReviewAction};
pub use filter::{build_query, ResultsQuery};
pub use session::{seed_query, CommitOutcome, ManualMatchSession, SearchOutcome, SessionState};
pub use store::{RefreshOutcome, RefreshTicket, ResultsStore, StoreSummary};
pub use upload::{check_file, UploadStaging, ACCEPTED_EXTENSIONS};
