//! Gacha core: pull record types and the pure merge, pity and statistics logic.
mod catalog;
mod document;
mod merge;
mod pity;
mod record;
mod stats;
mod view_model;

pub use catalog::{PoolCatalog, PoolKind, UpItemTable};
pub use document::{ExportInfo, GachaExportDocument, SCHEMA_VERSION};
pub use merge::{max_sequence_id, merge_records, MergeOutcome};
pub use pity::{pity_count, pity_per_pool, pull_index_within_pool, PullPosition};
pub use record::{CharacterPull, PullCommon, PullRecord, RecordCategory, WeaponPull, TOP_RARITY};
pub use stats::{
    describe_ratio, format_ratio, pool_statistics, ratio, PoolStatistics, NOT_ENOUGH_DATA,
    RATIO_SENTINEL,
};
pub use view_model::{GachaReport, PoolSummary, TopRarityHit};
