//! Query engine: the ordered subset of the merged set to display.

use super::filter::FilterState;
use super::reconcile::{MergedRecord, MergedRecordSet};

/// Returns the merged records matching every active criterion, in merged
/// order. Nothing is cached, so it is safe to call on every keystroke.
pub fn run_query<'a>(set: &'a MergedRecordSet, filter: &FilterState) -> Vec<&'a MergedRecord> {
    if filter.is_empty() {
        return set.iter().collect();
    }
    let compiled = filter.compile();
    set.iter()
        .filter(|entry| compiled.matches(entry.record()))
        .collect()
}
