#![allow(dead_code)]

use std::sync::Mutex;

use gacha_core::{CharacterPull, PullCommon};
use gacha_engine::{FetchError, PageRequest, PageSource, RecordPage};
use serde_json::{json, Value};

pub fn char_json(seq: u64, ts: u64, rarity: u8) -> Value {
    json!({
        "poolId": "special_1_0_1",
        "poolName": "Limited Headhunting",
        "rarity": rarity,
        "gachaTs": ts.to_string(),
        "seqId": seq.to_string(),
        "charId": format!("chr_{seq:04}"),
        "charName": format!("Operator {seq}"),
        "isFree": false,
        "isNew": false
    })
}

pub fn weapon_json(seq: u64, ts: u64, rarity: u8) -> Value {
    json!({
        "poolId": "weponbox_1_0_1",
        "poolName": "Arsenal",
        "rarity": rarity,
        "gachaTs": ts.to_string(),
        "seqId": seq.to_string(),
        "weaponId": format!("wpn_{seq:04}"),
        "weaponName": format!("Weapon {seq}"),
        "weaponType": "sword",
        "isNew": false
    })
}

pub fn page_body(list: Vec<Value>, has_more: bool) -> Value {
    json!({
        "code": 0,
        "msg": "",
        "data": { "list": list, "hasMore": has_more }
    })
}

pub fn char_pull(seq: u64, ts: u64, rarity: u8) -> CharacterPull {
    CharacterPull {
        common: PullCommon {
            pool_id: "special_1_0_1".to_string(),
            pool_name: "Limited Headhunting".to_string(),
            rarity,
            pulled_at_ms: ts,
            sequence_id: seq,
        },
        character_id: format!("chr_{seq:04}"),
        character_name: format!("Operator {seq}"),
        is_free_pull: false,
        is_new_to_roster: false,
    }
}

/// Serves canned pages in order and records every request it receives.
pub struct ScriptedSource {
    pages: Mutex<Vec<Result<RecordPage<CharacterPull>, FetchError>>>,
    pub requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Result<RecordPage<CharacterPull>, FetchError>>) -> Self {
        let mut pages = pages;
        pages.reverse();
        Self {
            pages: Mutex::new(pages),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn cursors(&self) -> Vec<Option<u64>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.cursor)
            .collect()
    }
}

#[async_trait::async_trait]
impl PageSource<CharacterPull> for ScriptedSource {
    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<RecordPage<CharacterPull>, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.pages.lock().unwrap().pop().unwrap_or(Ok(RecordPage {
            list: Vec::new(),
            has_more: false,
        }))
    }
}

pub fn page(seqs: &[u64], has_more: bool) -> Result<RecordPage<CharacterPull>, FetchError> {
    Ok(RecordPage {
        list: seqs.iter().map(|&seq| char_pull(seq, seq * 10, 3)).collect(),
        has_more,
    })
}
