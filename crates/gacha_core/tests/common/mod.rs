#![allow(dead_code)]

use gacha_core::{CharacterPull, PullCommon, WeaponPull};

pub fn char_pull(seq: u64, ts: u64, rarity: u8) -> CharacterPull {
    char_pull_in("special_1_0_1", seq, ts, rarity, false)
}

pub fn char_pull_in(pool: &str, seq: u64, ts: u64, rarity: u8, free: bool) -> CharacterPull {
    CharacterPull {
        common: PullCommon {
            pool_id: pool.to_string(),
            pool_name: format!("{pool} banner"),
            rarity,
            pulled_at_ms: ts,
            sequence_id: seq,
        },
        character_id: format!("chr_{seq:04}"),
        character_name: format!("Operator {seq}"),
        is_free_pull: free,
        is_new_to_roster: false,
    }
}

pub fn weapon_pull_in(pool: &str, seq: u64, ts: u64, rarity: u8) -> WeaponPull {
    WeaponPull {
        common: PullCommon {
            pool_id: pool.to_string(),
            pool_name: format!("{pool} arsenal"),
            rarity,
            pulled_at_ms: ts,
            sequence_id: seq,
        },
        weapon_id: format!("wpn_{seq:04}"),
        weapon_name: format!("Weapon {seq}"),
        weapon_category: "sword".to_string(),
        is_new_to_roster: false,
    }
}

pub fn ids<T: gacha_core::PullRecord>(records: &[T]) -> Vec<u64> {
    records.iter().map(|r| r.sequence_id()).collect()
}
