use crate::PullRecord;

/// Placeholder shown when a ratio has no data behind it.
pub const RATIO_SENTINEL: &str = "—";

/// End-user wording for [`RATIO_SENTINEL`].
pub const NOT_ENOUGH_DATA: &str = "not enough data";

/// Counts over a filtered set of pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStatistics {
    pub total: usize,
    pub free_count: usize,
    pub top_rarity_count: usize,
    pub non_free_count: usize,
}

impl PoolStatistics {
    /// Paid pulls per top-rarity hit, `None` without any hit.
    pub fn average_pulls_per_top_rarity(&self) -> Option<f64> {
        ratio(self.non_free_count, self.top_rarity_count)
    }
}

/// Collect [`PoolStatistics`] over the records accepted by `predicate`.
pub fn pool_statistics<T, F>(records: &[T], predicate: F) -> PoolStatistics
where
    T: PullRecord,
    F: Fn(&T) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(record))
        .fold(PoolStatistics::default(), |mut stats, record| {
            stats.total += 1;
            if record.is_free_pull() {
                stats.free_count += 1;
            } else {
                stats.non_free_count += 1;
            }
            if record.is_top_rarity() {
                stats.top_rarity_count += 1;
            }
            stats
        })
}

/// `numerator / denominator`, undefined for a zero denominator.
pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some(numerator as f64 / denominator as f64)
}

/// Render a ratio with fixed decimals, or [`RATIO_SENTINEL`].
pub fn format_ratio(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => RATIO_SENTINEL.to_string(),
    }
}

/// Like [`format_ratio`] but with wording meant for end users.
pub fn describe_ratio(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => NOT_ENOUGH_DATA.to_string(),
    }
}
