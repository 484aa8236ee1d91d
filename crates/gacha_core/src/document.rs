use serde::{Deserialize, Serialize};

use crate::{max_sequence_id, CharacterPull, WeaponPull};

/// Current layout version written into new documents.
pub const SCHEMA_VERSION: &str = "v1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    #[serde(rename = "uid")]
    pub player_uid: String,
    #[serde(rename = "lang")]
    pub language: String,
    #[serde(rename = "timezone")]
    pub timezone_offset_hours: i32,
    #[serde(rename = "exportTimestamp")]
    pub exported_at_epoch_seconds: i64,
    #[serde(rename = "version")]
    pub schema_version: String,
}

/// Everything persisted for one player: metadata plus both histories,
/// each ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaExportDocument {
    pub info: ExportInfo,
    #[serde(rename = "charList")]
    pub character_pulls: Vec<CharacterPull>,
    #[serde(rename = "weaponList")]
    pub weapon_pulls: Vec<WeaponPull>,
}

impl GachaExportDocument {
    /// An empty history for a player that has never been synced.
    pub fn empty(info: ExportInfo) -> Self {
        Self {
            info,
            character_pulls: Vec::new(),
            weapon_pulls: Vec::new(),
        }
    }

    pub fn known_max_character_sequence(&self) -> u64 {
        max_sequence_id(&self.character_pulls)
    }

    pub fn known_max_weapon_sequence(&self) -> u64 {
        max_sequence_id(&self.weapon_pulls)
    }

    pub fn total_pulls(&self) -> usize {
        self.character_pulls.len() + self.weapon_pulls.len()
    }
}
