// ── Local mirror ──
//
// Whole-collection JSON snapshots on disk, one file per key. Used as the
// offline fallback when the remote store is unreachable, and as the only
// home of the disease registry.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CoreError;

/// Which collection a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorKey {
    Medicines,
    Diseases,
}

impl MirrorKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medicines => "ayur_library_medicines",
            Self::Diseases => "ayur_library_diseases",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for MirrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable key/value storage for collection snapshots.
///
/// Each save replaces the previous snapshot wholesale; last write wins.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    dir: PathBuf,
}

impl LocalMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: MirrorKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Serialize `records` and atomically replace the snapshot for `key`.
    pub fn save<T: Serialize>(&self, key: MirrorKey, records: &[T]) -> Result<(), CoreError> {
        let err = |message: String| CoreError::Mirror {
            key: key.to_string(),
            message,
        };

        fs::create_dir_all(&self.dir).map_err(|e| err(format!("create {}: {e}", self.dir.display())))?;

        let data = serde_json::to_vec_pretty(records).map_err(|e| err(e.to_string()))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, data).map_err(|e| err(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).map_err(|e| err(format!("rename to {}: {e}", path.display())))?;

        debug!(key = %key, count = records.len(), "mirror snapshot saved");
        Ok(())
    }

    /// Read the snapshot for `key`. `Ok(None)` when nothing was ever saved.
    pub fn load<T: DeserializeOwned>(&self, key: MirrorKey) -> Result<Option<Vec<T>>, CoreError> {
        let path = self.path_for(key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::Mirror {
                    key: key.to_string(),
                    message: format!("read {}: {e}", path.display()),
                });
            }
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| CoreError::Mirror {
                key: key.to_string(),
                message: format!("corrupt snapshot: {e}"),
            })
    }

    /// Remove the snapshot for `key`. Returns whether one existed.
    pub fn clear(&self, key: MirrorKey) -> Result<bool, CoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::Mirror {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
