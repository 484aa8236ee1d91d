use gacha_core::{describe_ratio, GachaReport, PoolSummary};
use gacha_engine::SyncOutcome;

/// Number of recent top-rarity hits listed per pool.
const RECENT_HITS: usize = 5;

pub fn summary_lines(outcome: &SyncOutcome, report: &GachaReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Player {}: {} new character and {} new weapon records",
            report.player_uid, outcome.new_character_pulls, outcome.new_weapon_pulls
        ),
        format!(
            "Stored: {} records ({} character, {} weapon)",
            report.total_pulls, outcome.total_character_pulls, outcome.total_weapon_pulls
        ),
    ];
    for pool in &report.pools {
        lines.push(pool_line(pool));
        if let Some(hits) = hits_line(pool) {
            lines.push(hits);
        }
    }
    lines
}

fn pool_line(pool: &PoolSummary) -> String {
    let mut line = format!(
        "{}: pity {} | {} pulls ({} free) | {} top rarity | avg per top rarity {}",
        pool.kind.label(),
        pool.pity,
        pool.stats.total,
        pool.stats.free_count,
        pool.stats.top_rarity_count,
        describe_ratio(pool.average_per_top, 2)
    );
    if pool.kind.tracks_up_items() {
        line.push_str(&format!(
            " | avg per UP {}",
            describe_ratio(pool.average_per_up, 2)
        ));
    }
    line
}

fn hits_line(pool: &PoolSummary) -> Option<String> {
    if pool.top_hits.is_empty() {
        return None;
    }
    let hits: Vec<String> = pool
        .top_hits
        .iter()
        .take(RECENT_HITS)
        .map(|hit| {
            let number = match hit.pull_number {
                Some(position) => format!("#{}", position.number_or_fallback()),
                None => "free".to_string(),
            };
            let up = if hit.is_up { " UP" } else { "" };
            format!("{} ({number}{up})", hit.item_name)
        })
        .collect();
    Some(format!("  recent: {}", hits.join(", ")))
}
