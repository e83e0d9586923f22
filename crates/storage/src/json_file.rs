use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use worry_core::model::User;

use crate::repository::{StorageError, UserRecord, UserStore};

/// File-backed store keeping the whole history as one JSON document.
///
/// The document is the single persisted surface of the app; a missing file is
/// a fresh install, not an error. Writes go through a sibling temp file and a
/// rename so a crash mid-write cannot leave a truncated record behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl UserStore for JsonFileStore {
    fn load(&self) -> Result<Option<User>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted history, starting fresh");
                return Ok(None);
            }
            Err(err) => return Err(StorageError::Io(err.to_string())),
        };

        let record: UserRecord = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let user = record
            .into_user()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Ok(Some(user))
    }

    fn save(&self, user: &User) -> Result<(), StorageError> {
        let record = UserRecord::from_user(user);
        let raw = serde_json::to_string_pretty(&record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, raw).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(())
    }
}
