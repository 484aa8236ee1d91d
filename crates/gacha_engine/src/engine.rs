use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use sync_logging::{sync_info, sync_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::fetch::{ChannelProgressSink, FetchSettings, ReqwestPageSource, SourceEndpoints};
use crate::store::FileRecordStore;
use crate::sync::{sync_player, SyncError, SyncOutcome, SyncSettings, SyncSources};
use crate::EngineEvent;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub endpoints: SourceEndpoints,
    pub fetch: FetchSettings,
    pub sync: SyncSettings,
}

impl EngineConfig {
    pub fn default_with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            endpoints: SourceEndpoints::default(),
            fetch: FetchSettings::default(),
            sync: SyncSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnqueueError {
    #[error("a sync for player {player} is already running")]
    AlreadyRunning { player: String },
    #[error("sync engine has stopped")]
    Stopped,
}

enum EngineCommand {
    Sync { player: String, token: String },
}

/// Runs syncs on a background runtime, at most one per player at a time.
pub struct SyncEngine {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    cancel: CancellationToken,
}

impl SyncEngine {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let cancel = CancellationToken::new();

        let worker = Worker {
            config: Arc::new(config),
            in_flight: in_flight.clone(),
            cancel: cancel.clone(),
            event_tx,
        };

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let worker = worker.clone();
                runtime.spawn(async move {
                    worker.handle_command(command).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            in_flight,
            cancel,
        }
    }

    /// Start a sync for `player`, rejecting it if one is already running.
    pub fn enqueue(
        &self,
        player: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<(), EnqueueError> {
        let player = player.into();
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if !in_flight.insert(player.clone()) {
                return Err(EnqueueError::AlreadyRunning { player });
            }
        }

        let command = EngineCommand::Sync {
            player: player.clone(),
            token: token.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            release(&self.in_flight, &player);
            return Err(EnqueueError::Stopped);
        }
        Ok(())
    }

    pub fn is_busy(&self, player: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(player)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Cancel running syncs and any enqueued later; none of them will save.
    pub fn cancel_all(&self) {
        self.cancel.cancel();
    }
}

#[derive(Clone)]
struct Worker {
    config: Arc<EngineConfig>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl Worker {
    async fn handle_command(&self, command: EngineCommand) {
        match command {
            EngineCommand::Sync { player, token } => {
                sync_info!("Starting gacha sync for {}", player);
                let result = self.run_sync(&player, token).await;
                if let Err(err) = &result {
                    sync_warn!("Gacha sync for {} failed: {}", player, err);
                }
                release(&self.in_flight, &player);
                let _ = self
                    .event_tx
                    .send(EngineEvent::SyncCompleted { player, result });
            }
        }
    }

    async fn run_sync(
        &self,
        player: &str,
        token: String,
    ) -> Result<SyncOutcome, SyncError> {
        let source = ReqwestPageSource::new(
            self.config.endpoints.clone(),
            self.config.fetch.clone(),
            token,
        )
        .map_err(SyncError::Source)?;
        let store = FileRecordStore::new(self.config.data_dir.clone());
        let sink = ChannelProgressSink::new(player, self.event_tx.clone());
        let sources = SyncSources {
            characters: &source,
            weapons: &source,
        };

        sync_player(
            player,
            &store,
            sources,
            &self.config.sync,
            &sink,
            &self.cancel,
        )
        .await
    }
}

fn release(in_flight: &Mutex<HashSet<String>>, player: &str) {
    in_flight
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(player);
}
