use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::PullRecord;

/// Reporting groups the pools are folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoolKind {
    Limited,
    Weapon,
    Standard,
    Beginner,
}

impl PoolKind {
    pub const ALL: [PoolKind; 4] = [
        PoolKind::Limited,
        PoolKind::Weapon,
        PoolKind::Standard,
        PoolKind::Beginner,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PoolKind::Limited => "Limited",
            PoolKind::Weapon => "Weapon",
            PoolKind::Standard => "Standard",
            PoolKind::Beginner => "Beginner",
        }
    }

    /// Whether featured (UP) items are tracked for this kind.
    pub fn tracks_up_items(self) -> bool {
        matches!(self, PoolKind::Limited | PoolKind::Weapon)
    }
}

/// How character pool ids map onto [`PoolKind`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCatalog {
    pub limited_prefix: String,
    pub standard_pool_id: String,
    pub beginner_pool_id: String,
}

impl Default for PoolCatalog {
    fn default() -> Self {
        Self {
            limited_prefix: "special_".to_string(),
            standard_pool_id: "standard".to_string(),
            beginner_pool_id: "beginner".to_string(),
        }
    }
}

impl PoolCatalog {
    /// Kind of a character pool id; unknown ids are not reported.
    pub fn character_kind(&self, pool_id: &str) -> Option<PoolKind> {
        if pool_id.starts_with(&self.limited_prefix) {
            Some(PoolKind::Limited)
        } else if pool_id == self.standard_pool_id {
            Some(PoolKind::Standard)
        } else if pool_id == self.beginner_pool_id {
            Some(PoolKind::Beginner)
        } else {
            None
        }
    }
}

/// Featured item per pool id, supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpItemTable {
    items: HashMap<String, String>,
}

impl UpItemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, pool_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        self.insert(pool_id, item_id);
        self
    }

    pub fn insert(&mut self, pool_id: impl Into<String>, item_id: impl Into<String>) {
        self.items.insert(pool_id.into(), item_id.into());
    }

    pub fn get(&self, pool_id: &str) -> Option<&str> {
        self.items.get(pool_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when `record` is a top-rarity pull of its pool's featured item.
    pub fn is_up_hit<T: PullRecord>(&self, record: &T) -> bool {
        record.is_top_rarity() && self.get(record.pool_id()) == Some(record.item_id())
    }
}
