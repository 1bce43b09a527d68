//! Identity of a logical record across data sources.
//!
//! Seed data uses numeric or string ids while the live store assigns string
//! ids, so ids are always compared through [`canonical_id`].

use super::record::{format_float, FieldValue, Record};
use std::fmt;

/// Key used to decide whether two records describe the same release.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKey {
    CatalogNumber(String),
    Id(String),
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKey::CatalogNumber(c) => write!(f, "catalog:{}", c),
            MatchKey::Id(id) => write!(f, "id:{}", id),
        }
    }
}

/// Canonical string form of an id value.
///
/// `5`, `5.0` and `"5"` all canonicalize to `"5"`. Blank text, booleans and
/// structured values have no canonical form.
pub fn canonical_id(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Float(f) if f.is_finite() => Some(format_float(*f)),
        _ => None,
    }
}

/// Canonical id of a record, if it has a usable one.
pub fn record_id(record: &Record) -> Option<String> {
    record.id.as_ref().and_then(canonical_id)
}

/// The record's own match key: the catalog number when present, otherwise its
/// canonical id. Records with neither have no key and never collapse.
pub fn to_match_key(record: &Record) -> Option<MatchKey> {
    if let Some(catalog) = record.catalog_number() {
        return Some(MatchKey::CatalogNumber(catalog.into_owned()));
    }
    record_id(record).map(MatchKey::Id)
}

/// Whether a seed record and a live record are the same logical record.
///
/// Catalog numbers decide when both sides carry one. Otherwise the canonical
/// ids must both exist and be equal.
pub fn is_same_record(seed: &Record, live: &Record) -> bool {
    match (seed.catalog_number(), live.catalog_number()) {
        (Some(a), Some(b)) => a == b,
        _ => match (record_id(seed), record_id(live)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}
