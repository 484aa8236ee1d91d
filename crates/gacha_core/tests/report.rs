mod common;

use common::{char_pull_in, weapon_pull_in};
use gacha_core::{
    ExportInfo, GachaExportDocument, GachaReport, PoolCatalog, PoolKind, PullPosition,
    UpItemTable, SCHEMA_VERSION,
};
use pretty_assertions::assert_eq;

fn document() -> GachaExportDocument {
    let mut doc = GachaExportDocument::empty(ExportInfo {
        player_uid: "1234".to_string(),
        language: "zh-cn".to_string(),
        timezone_offset_hours: 8,
        exported_at_epoch_seconds: 1_700_000_000,
        schema_version: SCHEMA_VERSION.to_string(),
    });

    let mut featured = char_pull_in("special_1_0_2", 6, 600, 6, false);
    featured.character_id = "chr_0016_laevat".to_string();

    doc.character_pulls = vec![
        char_pull_in("special_1_0_2", 7, 700, 3, false),
        featured,
        char_pull_in("special_1_0_1", 5, 500, 3, true),
        char_pull_in("special_1_0_1", 4, 400, 6, false),
        char_pull_in("special_1_0_1", 3, 300, 3, false),
        char_pull_in("standard", 2, 200, 4, false),
        char_pull_in("beginner", 1, 100, 6, true),
    ];
    doc.weapon_pulls = vec![
        weapon_pull_in("weponbox_1_0_2", 13, 1300, 3),
        weapon_pull_in("weponbox_1_0_1", 12, 1200, 4),
        weapon_pull_in("weponbox_1_0_1", 11, 1100, 4),
        weapon_pull_in("weponbox_1_0_1", 10, 1000, 6),
    ];
    doc
}

fn up_items() -> UpItemTable {
    UpItemTable::new()
        .with_item("special_1_0_2", "chr_0016_laevat")
        .with_item("weponbox_1_0_1", "wpn_0010")
}

#[test]
fn limited_pools_are_aggregated() {
    sync_logging::initialize_for_tests();
    let report = GachaReport::build(&document(), &PoolCatalog::default(), &up_items());
    let limited = report.pool(PoolKind::Limited).unwrap();

    assert_eq!(limited.pity, 1);
    assert_eq!(limited.stats.total, 5);
    assert_eq!(limited.stats.free_count, 1);
    assert_eq!(limited.stats.top_rarity_count, 2);
    assert_eq!(limited.average_per_top, Some(2.0));
    assert_eq!(limited.average_per_up, Some(4.0));
    assert_eq!(limited.first_pull_ms, Some(300));
    assert_eq!(limited.last_pull_ms, Some(700));

    let hits: Vec<_> = limited
        .top_hits
        .iter()
        .map(|hit| (hit.sequence_id, hit.is_up, hit.pull_number))
        .collect();
    assert_eq!(
        hits,
        vec![
            (6, true, Some(PullPosition::Found(1))),
            (4, false, Some(PullPosition::Found(2))),
        ]
    );
}

#[test]
fn weapon_pity_is_deepest_pool() {
    let report = GachaReport::build(&document(), &PoolCatalog::default(), &up_items());
    let weapon = report.pool(PoolKind::Weapon).unwrap();

    assert_eq!(weapon.pity, 2);
    assert_eq!(weapon.stats.total, 4);
    assert_eq!(weapon.average_per_top, Some(4.0));
    assert_eq!(weapon.average_per_up, Some(4.0));
    assert!(weapon.top_hits[0].is_up);
}

#[test]
fn free_hits_have_no_pull_number_and_no_up_tracking() {
    let report = GachaReport::build(&document(), &PoolCatalog::default(), &up_items());
    let beginner = report.pool(PoolKind::Beginner).unwrap();

    assert_eq!(beginner.pity, 0);
    assert_eq!(beginner.average_per_top, Some(0.0));
    assert_eq!(beginner.average_per_up, None);
    assert!(beginner.top_hits[0].is_free);
    assert_eq!(beginner.top_hits[0].pull_number, None);
}

#[test]
fn empty_document_reports_sentinels() {
    let mut doc = document();
    doc.character_pulls.clear();
    doc.weapon_pulls.clear();

    let report = GachaReport::build(&doc, &PoolCatalog::default(), &UpItemTable::new());

    assert_eq!(report.total_pulls, 0);
    assert_eq!(report.pools.len(), 4);
    for pool in &report.pools {
        assert_eq!(pool.pity, 0);
        assert_eq!(pool.average_per_top, None);
        assert_eq!(pool.average_per_up, None);
        assert_eq!(pool.first_pull_ms, None);
        assert!(pool.top_hits.is_empty());
    }
}

#[test]
fn unknown_character_pools_are_not_reported() {
    let mut doc = document();
    doc.character_pulls
        .push(char_pull_in("collab_x", 50, 5000, 3, false));

    let report = GachaReport::build(&doc, &PoolCatalog::default(), &up_items());

    let counted: usize = [PoolKind::Limited, PoolKind::Standard, PoolKind::Beginner]
        .iter()
        .map(|kind| report.pool(*kind).unwrap().stats.total)
        .sum();
    assert_eq!(counted, 7);
    assert_eq!(report.total_pulls, 12);
}
