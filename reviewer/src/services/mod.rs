//! Service implementations
//!
//! Real implementations of all service traits for production use

pub mod matching_client;

// Re-export service implementations
pub use matching_client::RealMatchingService;
