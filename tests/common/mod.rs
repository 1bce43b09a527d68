//! Common test infrastructure
//!
//! Shared record fixtures and helpers for the end-to-end tests.
//! Tests should only import from this module, not from internal submodules.

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{live_json, live_records, seed_json, seed_records, SharedBuffer, TestFiles};
