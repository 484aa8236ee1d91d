use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gacha_core::{PoolCatalog, UpItemTable};
use gacha_engine::{EngineConfig, FetchSettings, SourceEndpoints, SyncSettings};
use serde::{Deserialize, Serialize};
use sync_logging::{sync_info, sync_warn};

/// On-disk settings for the `gacha-sync` binary. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoints: SourceEndpoints,
    pub fetch: FetchConfig,
    pub sync: SyncConfig,
    pub catalog: PoolCatalog,
    pub up_items: UpItemTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub language: String,
    pub server_id: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_ms: millis(settings.connect_timeout),
            request_timeout_ms: millis(settings.request_timeout),
            language: settings.language,
            server_id: settings.server_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub character_selectors: Vec<String>,
    pub page_delay_ms: u64,
    pub timezone_offset_hours: i32,
    pub overall_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let settings = SyncSettings::default();
        Self {
            character_selectors: settings.character_selectors,
            page_delay_ms: millis(settings.page_delay),
            timezone_offset_hours: settings.timezone_offset_hours,
            overall_timeout_ms: settings.overall_timeout.map(millis),
        }
    }
}

impl AppConfig {
    pub fn engine_config(&self, data_dir: PathBuf) -> EngineConfig {
        let fetch = FetchSettings {
            connect_timeout: Duration::from_millis(self.fetch.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.fetch.request_timeout_ms),
            language: self.fetch.language.clone(),
            server_id: self.fetch.server_id.clone(),
        };
        // Documents record the language the records were requested in.
        let sync = SyncSettings {
            character_selectors: self.sync.character_selectors.clone(),
            page_delay: Duration::from_millis(self.sync.page_delay_ms),
            language: self.fetch.language.clone(),
            timezone_offset_hours: self.sync.timezone_offset_hours,
            overall_timeout: self.sync.overall_timeout_ms.map(Duration::from_millis),
            ..SyncSettings::default()
        };

        EngineConfig {
            data_dir,
            endpoints: self.endpoints.clone(),
            fetch,
            sync,
        }
    }
}

/// Read the RON config at `path`; a missing or broken file yields defaults.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            sync_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            sync_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            sync_warn!("Failed to parse config from {:?}: {}, using defaults", path, err);
            AppConfig::default()
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.ron"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.fetch.connect_timeout_ms, 10_000);
        assert_eq!(config.sync.page_delay_ms, 100);
        assert_eq!(config.sync.character_selectors.len(), 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gacha_sync.ron");
        fs::write(
            &path,
            r#"(
                endpoints: (base_url: "http://127.0.0.1:8080"),
                sync: (page_delay_ms: 0, overall_timeout_ms: Some(60000)),
                up_items: { "special_1_0_1": "chr_0016_laevat" },
            )"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.endpoints.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.endpoints.weapon_path, "/api/record/weapon");
        assert_eq!(config.sync.page_delay_ms, 0);
        assert_eq!(config.up_items.get("special_1_0_1"), Some("chr_0016_laevat"));
        assert_eq!(config.catalog, PoolCatalog::default());

        let engine = config.engine_config(PathBuf::from("data"));
        assert_eq!(engine.sync.page_delay, Duration::ZERO);
        assert_eq!(engine.sync.overall_timeout, Some(Duration::from_secs(60)));
        assert_eq!(engine.fetch.request_timeout, Duration::from_secs(30));
        assert_eq!(engine.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        sync_logging::initialize_for_tests();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gacha_sync.ron");
        fs::write(&path, "(endpoints: [not, a, struct").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
    }
}
