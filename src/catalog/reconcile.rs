//! Reconciliation of the seed list with the latest live snapshot.

use super::match_key::{is_same_record, record_id, to_match_key, MatchKey};
use super::record::Record;
use serde::Serialize;
use std::collections::HashMap;

/// Where a merged record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Seed record with no live counterpart.
    Seed,
    /// Live record with no seed counterpart.
    Live,
    /// Live record that replaced one or more seed records.
    LiveOverride,
}

impl RecordOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOrigin::Seed => "seed",
            RecordOrigin::Live => "live",
            RecordOrigin::LiveOverride => "override",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MergedRecord {
    record: Record,
    origin: RecordOrigin,
}

impl MergedRecord {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn origin(&self) -> RecordOrigin {
        self.origin
    }

    pub fn match_key(&self) -> Option<MatchKey> {
        to_match_key(&self.record)
    }
}

/// Counters describing one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub seed_input: usize,
    pub live_input: usize,
    /// Records dropped because a later record of the same source had the same key.
    pub duplicates_collapsed: usize,
    /// Seed records replaced by a live record.
    pub overridden_seed: usize,
    pub live_only: usize,
    pub seed_only: usize,
}

/// The de-duplicated, reconciled collection.
///
/// Only read access is exposed; a new set is built on every reconciliation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedRecordSet {
    entries: Vec<MergedRecord>,
    stats: ReconcileStats,
}

impl MergedRecordSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MergedRecord> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergedRecord> {
        self.entries.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(MergedRecord::record)
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    pub fn find(&self, key: &MatchKey) -> Option<&MergedRecord> {
        self.entries
            .iter()
            .find(|e| e.match_key().as_ref() == Some(key))
    }
}

impl<'a> IntoIterator for &'a MergedRecordSet {
    type Item = &'a MergedRecord;
    type IntoIter = std::slice::Iter<'a, MergedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Collapses records sharing a match key within one source.
///
/// The last record wins and takes the slot of the key's first occurrence.
/// Returns the surviving records and the number of collapsed ones.
fn dedupe_source(records: &[Record]) -> (Vec<&Record>, usize) {
    let mut out: Vec<&Record> = Vec::with_capacity(records.len());
    let mut slots: HashMap<MatchKey, usize> = HashMap::new();
    let mut collapsed = 0;

    for record in records {
        match to_match_key(record) {
            Some(key) => match slots.get(&key) {
                Some(&slot) => {
                    out[slot] = record;
                    collapsed += 1;
                }
                None => {
                    slots.insert(key, out.len());
                    out.push(record);
                }
            },
            None => out.push(record),
        }
    }

    (out, collapsed)
}

struct SeedIndex {
    by_catalog: HashMap<String, Vec<usize>>,
    by_id: HashMap<String, Vec<usize>>,
}

impl SeedIndex {
    fn build(seed: &[&Record]) -> SeedIndex {
        let mut by_catalog: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, record) in seed.iter().enumerate() {
            if let Some(catalog) = record.catalog_number() {
                by_catalog.entry(catalog.into_owned()).or_default().push(i);
            }
            if let Some(id) = record_id(record) {
                by_id.entry(id).or_default().push(i);
            }
        }
        SeedIndex { by_catalog, by_id }
    }

    /// Indices of every seed record the live record is the same as, ascending.
    fn matches(&self, seed: &[&Record], live: &Record) -> Vec<usize> {
        let by_catalog = live
            .catalog_number()
            .and_then(|c| self.by_catalog.get(&*c));
        let by_id = record_id(live).and_then(|id| self.by_id.get(&id));

        let mut found: Vec<usize> = by_catalog
            .into_iter()
            .chain(by_id)
            .flatten()
            .copied()
            .filter(|&i| is_same_record(seed[i], live))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Merges the seed list with the live list.
///
/// Live records come first in live order, each replacing every seed record it
/// matches; the remaining seed records follow in seed order. The function is
/// pure, so calling it again with the same inputs yields the same set.
pub fn reconcile(seed: &[Record], live: &[Record]) -> MergedRecordSet {
    let (seed_records, seed_collapsed) = dedupe_source(seed);
    let (live_records, live_collapsed) = dedupe_source(live);

    let index = SeedIndex::build(&seed_records);
    let mut overridden = vec![false; seed_records.len()];
    let mut entries = Vec::with_capacity(seed_records.len() + live_records.len());
    let mut stats = ReconcileStats {
        seed_input: seed.len(),
        live_input: live.len(),
        duplicates_collapsed: seed_collapsed + live_collapsed,
        ..Default::default()
    };

    for live_record in live_records {
        let matched = index.matches(&seed_records, live_record);
        let origin = if matched.is_empty() {
            stats.live_only += 1;
            RecordOrigin::Live
        } else {
            for i in matched {
                if !overridden[i] {
                    overridden[i] = true;
                    stats.overridden_seed += 1;
                }
            }
            RecordOrigin::LiveOverride
        };
        entries.push(MergedRecord {
            record: live_record.clone(),
            origin,
        });
    }

    for (record, _) in seed_records
        .into_iter()
        .zip(overridden)
        .filter(|(_, overridden)| !overridden)
    {
        stats.seed_only += 1;
        entries.push(MergedRecord {
            record: record.clone(),
            origin: RecordOrigin::Seed,
        });
    }

    MergedRecordSet { entries, stats }
}
