mod filter;
mod match_key;
mod query;
mod reconcile;
mod record;
mod valuation;

pub use filter::{CompiledFilter, FilterState, FilterUpdate};
pub use match_key::{canonical_id, is_same_record, record_id, to_match_key, MatchKey};
pub use query::run_query;
pub use reconcile::{reconcile, MergedRecord, MergedRecordSet, ReconcileStats, RecordOrigin};
pub use record::{FieldValue, Record};
pub use valuation::{classify_value, value_midpoint, ValuationConfig, ValueTier};
