use std::sync::mpsc;
use std::time::Duration;

use gacha_core::{PullRecord, RecordCategory};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sync_logging::sync_debug;

use crate::{EngineEvent, FailureKind, FetchError, PageRequest, RecordPage, SyncEvent};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub language: String,
    pub server_id: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            language: "zh-cn".to_string(),
            server_id: "1".to_string(),
        }
    }
}

/// Where each record category is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceEndpoints {
    pub base_url: String,
    pub character_path: String,
    pub weapon_path: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            base_url: "https://ef-webview.hypergryph.com".to_string(),
            character_path: "/api/record/char".to_string(),
            weapon_path: "/api/record/weapon".to_string(),
        }
    }
}

impl SourceEndpoints {
    pub fn url_for(&self, category: RecordCategory) -> Result<url::Url, FetchError> {
        let path = match category {
            RecordCategory::Character => &self.character_path,
            RecordCategory::Weapon => &self.weapon_path,
        };
        url::Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

/// Discards all progress.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: SyncEvent) {}
}

pub struct ChannelProgressSink {
    player: String,
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(player: impl Into<String>, tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            player: player.into(),
            tx,
        }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: SyncEvent) {
        let _ = self.tx.send(EngineEvent::Progress {
            player: self.player.clone(),
            event,
        });
    }
}

/// A paginated source of pull records.
#[async_trait::async_trait]
pub trait PageSource<T: Send>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<RecordPage<T>, FetchError>;
}

/// Response wrapper used by the record service.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self) -> Result<T, FetchError> {
        if self.code != 0 {
            return Err(FetchError::new(FailureKind::Api { code: self.code }, self.msg));
        }
        self.data
            .ok_or_else(|| FetchError::new(FailureKind::Decode, "response carries no data"))
    }
}

/// [`PageSource`] backed by the record service's HTTP API.
#[derive(Clone)]
pub struct ReqwestPageSource {
    client: reqwest::Client,
    endpoints: SourceEndpoints,
    settings: FetchSettings,
    token: String,
}

impl std::fmt::Debug for ReqwestPageSource {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ReqwestPageSource")
            .field("endpoints", &self.endpoints)
            .field("settings", &self.settings)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl ReqwestPageSource {
    pub fn new(
        endpoints: SourceEndpoints,
        settings: FetchSettings,
        token: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            endpoints,
            settings,
            token: token.into(),
        })
    }

    fn query(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("lang", self.settings.language.clone()),
            ("token", self.token.clone()),
            ("server_id", self.settings.server_id.clone()),
        ];
        if let Some(selector) = &request.selector {
            query.push(("pool_type", selector.clone()));
        }
        if let Some(cursor) = request.cursor {
            query.push(("seq_id", cursor.to_string()));
        }
        query
    }
}

#[async_trait::async_trait]
impl<T> PageSource<T> for ReqwestPageSource
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<RecordPage<T>, FetchError> {
        let url = self.endpoints.url_for(request.category)?;

        let response = self
            .client
            .get(url)
            .query(&self.query(request))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let envelope: ApiEnvelope<RecordPage<T>> = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        envelope.into_data()
    }
}

/// Fetch every record newer than `known_max_sequence_id` for one selector.
///
/// Pages arrive newest first, so the first already-known record ends the
/// fetch and the rest of its page is dropped.
pub async fn fetch_incremental<T>(
    source: &dyn PageSource<T>,
    category: RecordCategory,
    selector: Option<&str>,
    known_max_sequence_id: u64,
    page_delay: Duration,
    sink: &dyn ProgressSink,
) -> Result<Vec<T>, FetchError>
where
    T: PullRecord + Send,
{
    let mut records = Vec::new();
    let mut cursor = None;
    let mut page_number = 0;

    loop {
        let request = PageRequest {
            category,
            selector: selector.map(str::to_string),
            cursor,
        };
        let page = source.fetch_page(&request).await?;
        page_number += 1;

        let has_more = page.has_more;
        let next_cursor = page.list.last().map(|record| record.sequence_id());
        let mut caught_up = false;
        let mut accepted = 0;
        for record in page.list {
            if record.sequence_id() <= known_max_sequence_id {
                caught_up = true;
                break;
            }
            records.push(record);
            accepted += 1;
        }

        sink.emit(SyncEvent::PageFetched {
            category,
            selector: request.selector.clone(),
            page: page_number,
            accepted,
        });

        if caught_up {
            sync_debug!(
                "Reached stored {} records at seq_id {} (selector {:?}), stopping fetch",
                category,
                known_max_sequence_id,
                selector
            );
            sink.emit(SyncEvent::CaughtUp {
                category,
                selector: request.selector,
                known_max: known_max_sequence_id,
            });
            break;
        }

        match next_cursor {
            Some(next) if has_more => cursor = Some(next),
            _ => break,
        }

        if !page_delay.is_zero() {
            tokio::time::sleep(page_delay).await;
        }
    }

    Ok(records)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
