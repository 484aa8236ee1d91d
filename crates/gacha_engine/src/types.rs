use std::fmt;

use gacha_core::RecordCategory;
use serde::Deserialize;
use thiserror::Error;

use crate::sync::{SyncError, SyncOutcome};

/// One request against the record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub category: RecordCategory,
    /// Pool selector; `None` for categories fetched as a single stream.
    pub selector: Option<String>,
    /// Sequence id of the last record of the previous page.
    pub cursor: Option<u64>,
}

/// One page of records, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordPage<T> {
    pub list: Vec<T>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Progress reported while a sync runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    PageFetched {
        category: RecordCategory,
        selector: Option<String>,
        page: usize,
        accepted: usize,
    },
    /// The fetch reached records that were already stored.
    CaughtUp {
        category: RecordCategory,
        selector: Option<String>,
        known_max: u64,
    },
}

#[derive(Debug)]
pub enum EngineEvent {
    Progress {
        player: String,
        event: SyncEvent,
    },
    SyncCompleted {
        player: String,
        result: Result<SyncOutcome, SyncError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The source answered with a non-zero status code in its envelope.
    Api { code: i64 },
    Decode,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Api { code } => write!(f, "api error code {code}"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
