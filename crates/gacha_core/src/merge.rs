use std::collections::HashSet;

use crate::PullRecord;

/// Result of merging freshly fetched pulls into a stored history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome<T> {
    /// Deduplicated history, most recent (highest sequence id) first.
    pub merged: Vec<T>,
    /// Number of incoming records that were not already present.
    pub new_count: usize,
}

/// Merge `incoming` into `existing`, keyed by sequence id.
///
/// Inputs are left untouched. The first occurrence of an id wins, so stored
/// records are never replaced by refetched copies.
pub fn merge_records<T>(existing: &[T], incoming: &[T]) -> MergeOutcome<T>
where
    T: PullRecord + Clone,
{
    let mut seen: HashSet<u64> = HashSet::with_capacity(existing.len() + incoming.len());
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());

    for record in existing {
        if seen.insert(record.sequence_id()) {
            merged.push(record.clone());
        }
    }

    let mut new_count = 0;
    for record in incoming {
        if seen.insert(record.sequence_id()) {
            merged.push(record.clone());
            new_count += 1;
        }
    }

    merged.sort_by(|a, b| b.sequence_id().cmp(&a.sequence_id()));
    MergeOutcome { merged, new_count }
}

/// Highest sequence id in `records`, or 0 for an empty history.
pub fn max_sequence_id<T: PullRecord>(records: &[T]) -> u64 {
    records
        .iter()
        .map(PullRecord::sequence_id)
        .max()
        .unwrap_or(0)
}
