//! Shared constants for end-to-end tests
//!
//! When the fixture collection changes, update only this file and
//! `fixtures.rs`.

// ============================================================================
// Seed titles, in seed order
// ============================================================================

pub const BLUE_TRAIN: &str = "Blue Train";
pub const KIND_OF_BLUE: &str = "Kind of Blue";
pub const REMAIN_IN_LIGHT: &str = "Remain in Light";
pub const AUTOBAHN: &str = "Autobahn";
pub const BLUE_LINES: &str = "Blue Lines";

// ============================================================================
// Live titles, in live order
// ============================================================================

/// Overrides Kind of Blue by catalog number
pub const KIND_OF_BLUE_MONO: &str = "Kind of Blue (Mono)";

/// Overrides Remain in Light by id, neither side has a catalog number
pub const REMAIN_IN_LIGHT_REMASTER: &str = "Remain in Light (Remaster)";

/// Live only
pub const HEAVEN_OR_LAS_VEGAS: &str = "Heaven or Las Vegas";

// ============================================================================
// Collection sizes
// ============================================================================

pub const SEED_COUNT: usize = 5;
pub const LIVE_COUNT: usize = 3;
pub const MERGED_COUNT: usize = 6;
