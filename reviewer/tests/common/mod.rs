//! Common test utilities and infrastructure
//!
//! Shared fixtures and helpers used by the reviewer integration suites.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{GatedResults, TestHelpers};
