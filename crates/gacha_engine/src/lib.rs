//! Gacha engine: record fetching, document persistence and sync orchestration.
mod engine;
mod fetch;
mod persist;
mod store;
mod sync;
mod types;

pub use engine::{EngineConfig, EnqueueError, SyncEngine};
pub use fetch::{
    fetch_incremental, ChannelProgressSink, FetchSettings, NullSink, PageSource, ProgressSink,
    ReqwestPageSource, SourceEndpoints,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use store::{
    load_document, save_document, DocumentError, FileRecordStore, RecordStore, DOCUMENT_FILENAME,
};
pub use sync::{
    sync_player, SyncError, SyncOutcome, SyncSettings, SyncSources, SYNC_FAILED_MESSAGE,
};
pub use types::{EngineEvent, FailureKind, FetchError, PageRequest, RecordPage, SyncEvent};
