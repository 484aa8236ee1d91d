use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest rarity tier; a pull at this tier resets pity.
pub const TOP_RARITY: u8 = 6;

/// The two pull histories kept per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    Character,
    Weapon,
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCategory::Character => write!(f, "character"),
            RecordCategory::Weapon => write!(f, "weapon"),
        }
    }
}

/// Fields shared by every pull, whatever its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullCommon {
    pub pool_id: String,
    pub pool_name: String,
    pub rarity: u8,
    #[serde(rename = "gachaTs", with = "decimal_string")]
    pub pulled_at_ms: u64,
    #[serde(rename = "seqId", with = "decimal_string")]
    pub sequence_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPull {
    #[serde(flatten)]
    pub common: PullCommon,
    #[serde(rename = "charId")]
    pub character_id: String,
    #[serde(rename = "charName")]
    pub character_name: String,
    #[serde(rename = "isFree")]
    pub is_free_pull: bool,
    #[serde(rename = "isNew")]
    pub is_new_to_roster: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponPull {
    #[serde(flatten)]
    pub common: PullCommon,
    pub weapon_id: String,
    pub weapon_name: String,
    #[serde(rename = "weaponType")]
    pub weapon_category: String,
    #[serde(rename = "isNew")]
    pub is_new_to_roster: bool,
}

/// Uniform view over pull categories used by merging, pity and statistics.
pub trait PullRecord {
    fn common(&self) -> &PullCommon;

    /// Identifier of the character or weapon obtained.
    fn item_id(&self) -> &str;

    fn item_name(&self) -> &str;

    /// Free pulls neither advance pity nor count towards paid totals.
    fn is_free_pull(&self) -> bool {
        false
    }

    fn pool_id(&self) -> &str {
        &self.common().pool_id
    }

    fn rarity(&self) -> u8 {
        self.common().rarity
    }

    fn sequence_id(&self) -> u64 {
        self.common().sequence_id
    }

    fn pulled_at_ms(&self) -> u64 {
        self.common().pulled_at_ms
    }

    fn is_top_rarity(&self) -> bool {
        self.rarity() == TOP_RARITY
    }

    /// Chronological key: timestamp first, sequence id breaks batch ties.
    fn chronological_key(&self) -> (u64, u64) {
        (self.pulled_at_ms(), self.sequence_id())
    }
}

impl PullRecord for CharacterPull {
    fn common(&self) -> &PullCommon {
        &self.common
    }

    fn item_id(&self) -> &str {
        &self.character_id
    }

    fn item_name(&self) -> &str {
        &self.character_name
    }

    fn is_free_pull(&self) -> bool {
        self.is_free_pull
    }
}

impl PullRecord for WeaponPull {
    fn common(&self) -> &PullCommon {
        &self.common
    }

    fn item_id(&self) -> &str {
        &self.weapon_id
    }

    fn item_name(&self) -> &str {
        &self.weapon_name
    }
}

impl<R: PullRecord + ?Sized> PullRecord for &R {
    fn common(&self) -> &PullCommon {
        (**self).common()
    }

    fn item_id(&self) -> &str {
        (**self).item_id()
    }

    fn item_name(&self) -> &str {
        (**self).item_name()
    }

    fn is_free_pull(&self) -> bool {
        (**self).is_free_pull()
    }
}

/// Integers that travel as decimal strings. Plain JSON numbers are accepted on read.
mod decimal_string {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or its decimal string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value).map_err(|_| E::custom(format!("negative value {value}")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
            value
                .trim()
                .parse::<u64>()
                .map_err(|err| E::custom(format!("invalid decimal {value:?}: {err}")))
        }
    }
}
