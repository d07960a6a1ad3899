//! File-backed storage.
//!
//! All keys live in one JSON document (`{"key": "blob", ...}`). Every write
//! rewrites the document through a temp file and a rename, so readers see
//! either the old document or the new one.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{Storage, StorageError};

/// Storage persisted to a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create storage backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(document)?;

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir)?;
                dir.to_path_buf()
            }
            _ => PathBuf::from("."),
        };

        // Write to temp file, then rename for atomicity.
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "storage".into(), |name| name.to_string_lossy().into_owned());
        let tmp_path = parent.join(format!(".{file_name}.tmp"));
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), "Storage document written");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rocketshoes-file-storage-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = scratch_dir("missing");
        let storage = FileStorage::new(dir.join("storage.json"));
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[test]
    fn test_set_persists_across_instances() {
        let dir = scratch_dir("persist");
        let path = dir.join("nested").join("storage.json");

        FileStorage::new(&path).set("cart", "[1,2]").unwrap();
        FileStorage::new(&path).set("other", "x").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
        assert!(!dir.join("nested").join(".storage.json.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get("cart"), Err(StorageError::Parse(_))));
        // A failed read must not clobber the file.
        assert!(storage.set("cart", "[]").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

        fs::remove_dir_all(&dir).unwrap();
    }
}
