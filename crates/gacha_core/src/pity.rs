use std::collections::BTreeMap;

use sync_logging::sync_warn;

use crate::PullRecord;

/// Pulls since the last top-rarity hit, scanning newest first.
///
/// Free pulls do not count, but a free top-rarity pull still stops the scan.
pub fn pity_count<'a, T, I>(records: I) -> u32
where
    T: PullRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut ordered: Vec<&T> = records.into_iter().collect();
    ordered.sort_by(|a, b| b.chronological_key().cmp(&a.chronological_key()));

    let mut pity = 0;
    for record in ordered {
        if record.is_top_rarity() {
            break;
        }
        if !record.is_free_pull() {
            pity += 1;
        }
    }
    pity
}

/// Current pity for every pool present in `records`.
pub fn pity_per_pool<T: PullRecord>(records: &[T]) -> BTreeMap<String, u32> {
    let mut by_pool: BTreeMap<&str, Vec<&T>> = BTreeMap::new();
    for record in records {
        by_pool.entry(record.pool_id()).or_default().push(record);
    }

    by_pool
        .into_iter()
        .map(|(pool_id, pool)| (pool_id.to_string(), pity_count(pool)))
        .collect()
}

/// Where a pull sits among the paid pulls of its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullPosition {
    /// 1-based position in chronological order.
    Found(usize),
    /// The target is not among its pool's paid pulls.
    NotFound,
}

impl PullPosition {
    /// Position to display, with `NotFound` collapsed to 1.
    ///
    /// Reaching the fallback means the history is inconsistent; it is logged.
    pub fn number_or_fallback(self) -> usize {
        match self {
            PullPosition::Found(number) => number,
            PullPosition::NotFound => {
                sync_warn!("Pull position unavailable; falling back to 1");
                1
            }
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, PullPosition::Found(_))
    }
}

/// Position of `target` among the paid pulls of its pool, oldest first.
///
/// A record is matched on both sequence id and timestamp.
pub fn pull_index_within_pool<T: PullRecord>(records: &[T], target: &T) -> PullPosition {
    let mut pool: Vec<&T> = records
        .iter()
        .filter(|record| record.pool_id() == target.pool_id() && !record.is_free_pull())
        .collect();
    pool.sort_by_key(|record| record.chronological_key());

    match pool.iter().position(|record| {
        record.sequence_id() == target.sequence_id()
            && record.pulled_at_ms() == target.pulled_at_ms()
    }) {
        Some(index) => PullPosition::Found(index + 1),
        None => {
            sync_warn!(
                "Pull seq_id={} not found among paid pulls of pool {}",
                target.sequence_id(),
                target.pool_id()
            );
            PullPosition::NotFound
        }
    }
}
