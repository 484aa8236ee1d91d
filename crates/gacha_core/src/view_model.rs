//! Aggregated, render-ready view of a player's pull history.
use crate::{
    pity_count, pity_per_pool, pool_statistics, pull_index_within_pool, ratio,
    GachaExportDocument, PoolCatalog, PoolKind, PoolStatistics, PullPosition, PullRecord,
    UpItemTable,
};

/// One top-rarity pull as shown in a pool's hit list.
#[derive(Debug, Clone, PartialEq)]
pub struct TopRarityHit {
    pub sequence_id: u64,
    pub pool_id: String,
    pub item_id: String,
    pub item_name: String,
    pub pulled_at_ms: u64,
    pub is_free: bool,
    pub is_up: bool,
    /// Paid-pull number within the pool; `None` for free pulls.
    pub pull_number: Option<PullPosition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolSummary {
    pub kind: PoolKind,
    pub pity: u32,
    pub stats: PoolStatistics,
    pub average_per_top: Option<f64>,
    /// Only tracked for limited and weapon pools.
    pub average_per_up: Option<f64>,
    pub first_pull_ms: Option<u64>,
    pub last_pull_ms: Option<u64>,
    /// Newest first.
    pub top_hits: Vec<TopRarityHit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GachaReport {
    pub player_uid: String,
    pub total_pulls: usize,
    /// One entry per [`PoolKind`], in [`PoolKind::ALL`] order.
    pub pools: Vec<PoolSummary>,
}

impl GachaReport {
    pub fn build(
        document: &GachaExportDocument,
        catalog: &PoolCatalog,
        up_items: &UpItemTable,
    ) -> Self {
        let characters = &document.character_pulls;
        let weapons = &document.weapon_pulls;

        let pools = PoolKind::ALL
            .iter()
            .map(|&kind| match kind {
                PoolKind::Weapon => {
                    // Weapon pools are reported together; the deepest pity wins.
                    let pity = pity_per_pool(weapons).into_values().max().unwrap_or(0);
                    summarize(kind, weapons, weapons.iter().collect(), pity, up_items)
                }
                character_kind => {
                    let members: Vec<_> = characters
                        .iter()
                        .filter(|pull| catalog.character_kind(pull.pool_id()) == Some(character_kind))
                        .collect();
                    let pity = pity_count(members.iter().copied());
                    summarize(kind, characters, members, pity, up_items)
                }
            })
            .collect();

        Self {
            player_uid: document.info.player_uid.clone(),
            total_pulls: document.total_pulls(),
            pools,
        }
    }

    pub fn pool(&self, kind: PoolKind) -> Option<&PoolSummary> {
        self.pools.iter().find(|pool| pool.kind == kind)
    }
}

fn summarize<T: PullRecord>(
    kind: PoolKind,
    all: &[T],
    members: Vec<&T>,
    pity: u32,
    up_items: &UpItemTable,
) -> PoolSummary {
    let stats = pool_statistics(&members, |_| true);

    let average_per_up = if kind.tracks_up_items() {
        let up_hits = members.iter().filter(|pull| up_items.is_up_hit(**pull)).count();
        ratio(stats.non_free_count, up_hits)
    } else {
        None
    };

    let mut hits: Vec<&T> = members
        .iter()
        .copied()
        .filter(|pull| pull.is_top_rarity())
        .collect();
    hits.sort_by(|a, b| b.chronological_key().cmp(&a.chronological_key()));

    let top_hits = hits
        .into_iter()
        .map(|hit| TopRarityHit {
            sequence_id: hit.sequence_id(),
            pool_id: hit.pool_id().to_string(),
            item_id: hit.item_id().to_string(),
            item_name: hit.item_name().to_string(),
            pulled_at_ms: hit.pulled_at_ms(),
            is_free: hit.is_free_pull(),
            is_up: kind.tracks_up_items() && up_items.is_up_hit(hit),
            pull_number: (!hit.is_free_pull()).then(|| pull_index_within_pool(all, hit)),
        })
        .collect();

    PoolSummary {
        kind,
        pity,
        average_per_top: stats.average_pulls_per_top_rarity(),
        average_per_up,
        first_pull_ms: members.iter().map(|pull| pull.pulled_at_ms()).min(),
        last_pull_ms: members.iter().map(|pull| pull.pulled_at_ms()).max(),
        stats,
        top_hits,
    }
}
