//! One incremental sync: load, fetch what is new, merge, save.
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gacha_core::{
    max_sequence_id, merge_records, CharacterPull, ExportInfo, GachaExportDocument,
    RecordCategory, WeaponPull, SCHEMA_VERSION,
};
use sync_logging::{sync_debug, sync_info};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::fetch::{fetch_incremental, PageSource, ProgressSink};
use crate::store::{DocumentError, RecordStore};
use crate::FetchError;

/// Message shown to end users when a sync fails for any reason.
pub const SYNC_FAILED_MESSAGE: &str = "Sync failed, please try again later.";

#[derive(Clone)]
pub struct SyncSettings {
    /// Character pools are fetched one selector at a time, in this order.
    pub character_selectors: Vec<String>,
    /// Pause between page requests of one selector.
    pub page_delay: Duration,
    pub language: String,
    pub timezone_offset_hours: i32,
    /// Upper bound for fetching and merging; saving is not interrupted.
    pub overall_timeout: Option<Duration>,
    /// Seconds since the Unix epoch, stamped into saved documents.
    pub clock: Arc<dyn Fn() -> i64 + Send + Sync>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            character_selectors: vec![
                "E_CharacterGachaPoolType_Special".to_string(),
                "E_CharacterGachaPoolType_Standard".to_string(),
                "E_CharacterGachaPoolType_Beginner".to_string(),
            ],
            page_delay: Duration::from_millis(100),
            language: "zh-cn".to_string(),
            timezone_offset_hours: 8,
            overall_timeout: None,
            clock: Arc::new(|| chrono::Utc::now().timestamp()),
        }
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("character_selectors", &self.character_selectors)
            .field("page_delay", &self.page_delay)
            .field("language", &self.language)
            .field("timezone_offset_hours", &self.timezone_offset_hours)
            .field("overall_timeout", &self.overall_timeout)
            .finish_non_exhaustive()
    }
}

/// The record sources a sync reads from.
#[derive(Clone, Copy)]
pub struct SyncSources<'a> {
    pub characters: &'a dyn PageSource<CharacterPull>,
    pub weapons: &'a dyn PageSource<WeaponPull>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub new_character_pulls: usize,
    pub new_weapon_pulls: usize,
    pub total_character_pulls: usize,
    pub total_weapon_pulls: usize,
    pub document_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("record source unavailable: {0}")]
    Source(FetchError),
    #[error("fetching {category} records failed: {source}")]
    Fetch {
        category: RecordCategory,
        selector: Option<String>,
        source: FetchError,
    },
    #[error("saving gacha document failed: {0}")]
    Document(#[from] DocumentError),
    #[error("sync cancelled")]
    Cancelled,
    #[error("sync timed out")]
    TimedOut,
}

impl SyncError {
    /// Text meant for the end user; details belong in the log.
    pub fn user_message(&self) -> &'static str {
        SYNC_FAILED_MESSAGE
    }
}

struct MergedUpdate {
    document: GachaExportDocument,
    new_character_pulls: usize,
    new_weapon_pulls: usize,
}

/// Bring `player`'s stored history up to date.
///
/// Nothing is written unless every category was fetched completely; on any
/// error the stored document is left as it was. Callers must not run two
/// syncs for the same player at once.
pub async fn sync_player(
    player: &str,
    store: &dyn RecordStore,
    sources: SyncSources<'_>,
    settings: &SyncSettings,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<SyncOutcome, SyncError> {
    let existing = store.load(player);
    let work = fetch_and_merge(player, existing, sources, settings, sink);

    let bounded = async {
        match settings.overall_timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| SyncError::TimedOut)?,
            None => work.await,
        }
    };

    let update = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SyncError::Cancelled),
        result = bounded => result?,
    };

    let document_path = store.save(player, &update.document)?;
    let outcome = SyncOutcome {
        new_character_pulls: update.new_character_pulls,
        new_weapon_pulls: update.new_weapon_pulls,
        total_character_pulls: update.document.character_pulls.len(),
        total_weapon_pulls: update.document.weapon_pulls.len(),
        document_path,
    };

    sync_info!(
        "Gacha records updated for {} - Total: {} character, {} weapon | New: {} character, {} weapon",
        player,
        outcome.total_character_pulls,
        outcome.total_weapon_pulls,
        outcome.new_character_pulls,
        outcome.new_weapon_pulls
    );
    Ok(outcome)
}

async fn fetch_and_merge(
    player: &str,
    existing: Option<GachaExportDocument>,
    sources: SyncSources<'_>,
    settings: &SyncSettings,
    sink: &dyn ProgressSink,
) -> Result<MergedUpdate, SyncError> {
    let (stored_characters, stored_weapons) = existing
        .map(|document| (document.character_pulls, document.weapon_pulls))
        .unwrap_or_default();

    let character_known = max_sequence_id(&stored_characters);
    let weapon_known = max_sequence_id(&stored_weapons);
    sync_debug!(
        "Existing max seq_id for {} - character: {}, weapon: {}",
        player,
        character_known,
        weapon_known
    );

    let mut fetched_characters = Vec::new();
    for selector in &settings.character_selectors {
        let batch = fetch_incremental(
            sources.characters,
            RecordCategory::Character,
            Some(selector.as_str()),
            character_known,
            settings.page_delay,
            sink,
        )
        .await
        .map_err(|source| SyncError::Fetch {
            category: RecordCategory::Character,
            selector: Some(selector.clone()),
            source,
        })?;
        sync_debug!("New character records fetched for pool {}: {}", selector, batch.len());
        fetched_characters.extend(batch);
    }

    let fetched_weapons = fetch_incremental(
        sources.weapons,
        RecordCategory::Weapon,
        None,
        weapon_known,
        settings.page_delay,
        sink,
    )
    .await
    .map_err(|source| SyncError::Fetch {
        category: RecordCategory::Weapon,
        selector: None,
        source,
    })?;
    sync_debug!("New weapon records fetched: {}", fetched_weapons.len());

    let characters = merge_records(&stored_characters, &fetched_characters);
    let weapons = merge_records(&stored_weapons, &fetched_weapons);

    let info = ExportInfo {
        player_uid: player.to_string(),
        language: settings.language.clone(),
        timezone_offset_hours: settings.timezone_offset_hours,
        exported_at_epoch_seconds: (settings.clock)(),
        schema_version: SCHEMA_VERSION.to_string(),
    };

    Ok(MergedUpdate {
        document: GachaExportDocument {
            info,
            character_pulls: characters.merged,
            weapon_pulls: weapons.merged,
        },
        new_character_pulls: characters.new_count,
        new_weapon_pulls: weapons.new_count,
    })
}
