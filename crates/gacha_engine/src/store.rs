use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use gacha_core::GachaExportDocument;
use sync_logging::{sync_debug, sync_warn};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

/// File name of the per-player document.
pub const DOCUMENT_FILENAME: &str = "gacha_logs.json";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid player id {0:?}")]
    InvalidPlayer(String),
}

/// Read a stored document.
///
/// A missing file, unreadable file or malformed content all yield `None`;
/// the last two are logged.
pub fn load_document(path: &Path) -> Option<GachaExportDocument> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            sync_warn!("Failed to read gacha document from {:?}: {}", path, err);
            return None;
        }
    };

    match serde_json::from_str::<GachaExportDocument>(&content) {
        Ok(document) => {
            sync_debug!(
                "Loaded {} character and {} weapon records from {:?}",
                document.character_pulls.len(),
                document.weapon_pulls.len(),
                path
            );
            Some(document)
        }
        Err(err) => {
            sync_warn!(
                "Failed to parse gacha document from {:?}: {}, will fetch all records",
                path,
                err
            );
            None
        }
    }
}

/// Write `document` to `path` as pretty-printed JSON, all or nothing.
pub fn save_document(path: &Path, document: &GachaExportDocument) -> Result<PathBuf, DocumentError> {
    let (dir, filename) = match (path.parent(), path.file_name()) {
        (Some(dir), Some(filename)) => (dir, filename),
        _ => {
            return Err(PersistError::OutputDir(format!("invalid document path {path:?}")).into())
        }
    };
    let content = serde_json::to_string_pretty(document)?;
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    Ok(writer.write(filename, &content)?)
}

/// Persistence of one document per player.
pub trait RecordStore: Send + Sync {
    /// The stored document, or `None` when there is no usable history.
    fn load(&self, player: &str) -> Option<GachaExportDocument>;

    fn save(&self, player: &str, document: &GachaExportDocument)
        -> Result<PathBuf, DocumentError>;
}

/// Stores documents as `{root}/{player}/gacha_logs.json`.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    root: PathBuf,
}

impl FileRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn document_path(&self, player: &str) -> Result<PathBuf, DocumentError> {
        let mut components = Path::new(player).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(DocumentError::InvalidPlayer(player.to_string())),
        }
        Ok(self.root.join(player).join(DOCUMENT_FILENAME))
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self, player: &str) -> Option<GachaExportDocument> {
        match self.document_path(player) {
            Ok(path) => load_document(&path),
            Err(err) => {
                sync_warn!("{}", err);
                None
            }
        }
    }

    fn save(
        &self,
        player: &str,
        document: &GachaExportDocument,
    ) -> Result<PathBuf, DocumentError> {
        save_document(&self.document_path(player)?, document)
    }
}
