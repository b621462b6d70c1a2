//! JSON-file key-value store
//!
//! All entries live in one flat JSON object (`storage.json`). Writers hold an
//! exclusive lock on a sidecar `storage.json.lock`, write the new content to
//! `storage.json.tmp` and rename it over the old file, so readers only ever
//! see a complete object.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;
use crate::services::logging::Diagnostics;

type Entries = BTreeMap<String, String>;

/// Key-value store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    diagnostics: Diagnostics,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            diagnostics: Diagnostics::disabled(),
        }
    }

    /// Store at `<data_dir>/storage.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("storage.json"))
    }

    /// Record storage resets in the diagnostic log
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("storage"));
        name.push(suffix);
        path.with_file_name(name)
    }

    fn lock_file(path: &Path) -> Result<File> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(Self::sibling(path, ".lock"))?;
        Ok(file)
    }

    fn read_entries(path: &Path) -> Result<Entries> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::storage(format!("Corrupt storage file: {}", e)))
    }

    fn write_entries(path: &Path, entries: &Entries) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = Self::sibling(path, ".tmp");
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn read_locked(path: &Path) -> Result<Entries> {
        if !path.exists() {
            return Ok(Entries::new());
        }
        let lock = Self::lock_file(path)?;
        lock.lock_shared()?;
        let result = Self::read_entries(path);
        let _ = FileExt::unlock(&lock);
        result
    }

    /// Apply `apply` to the stored entries and write them back.
    ///
    /// A file that no longer parses is replaced by the new entries alone;
    /// its parse error is returned alongside for logging.
    fn update_locked<F>(path: &Path, apply: F) -> Result<Option<Error>>
    where
        F: FnOnce(&mut Entries),
    {
        let lock = Self::lock_file(path)?;
        lock.lock_exclusive()?;
        let result = (|| {
            let (mut entries, discarded) = match Self::read_entries(path) {
                Ok(entries) => (entries, None),
                Err(e @ Error::Storage(_)) => (Entries::new(), Some(e)),
                Err(e) => return Err(e),
            };
            apply(&mut entries);
            Self::write_entries(path, &entries)?;
            Ok(discarded)
        })();
        let _ = FileExt::unlock(&lock);
        result
    }

    /// Run blocking file work off the async executor
    async fn blocking<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || work(&path))
            .await
            .map_err(|e| Error::storage(format!("Storage task failed: {}", e)))?
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) + Send + 'static,
    {
        let discarded = self
            .blocking(move |path| Self::update_locked(path, apply))
            .await?;
        if let Some(e) = discarded {
            self.diagnostics.failure("storage_reset", "storage", &e);
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |path| Ok(Self::read_locked(path)?.remove(&key)))
            .await
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let entries: Vec<(String, String)> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.update(move |stored| stored.extend(entries)).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.update(move |stored| {
            for key in &keys {
                stored.remove(key);
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());
        assert_eq!(store.get("userToken").await.unwrap(), None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());

        store
            .set_many(&[("userToken", "abc".to_string()), ("userData", "{}".to_string())])
            .await
            .unwrap();
        assert_eq!(store.get("userToken").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get("userData").await.unwrap().as_deref(), Some("{}"));

        store.remove_many(&["userToken", "userData", "other"]).await.unwrap();
        assert_eq!(store.get("userToken").await.unwrap(), None);
        assert_eq!(store.get("userData").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_persist_across_instances() {
        let dir = tempdir().unwrap();
        FileKeyValueStore::in_dir(dir.path())
            .set_many(&[("userToken", "abc".to_string())])
            .await
            .unwrap();

        let reopened = FileKeyValueStore::in_dir(dir.path());
        assert_eq!(reopened.get("userToken").await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_shorter_rewrite_truncates() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());
        store
            .set_many(&[("userData", "x".repeat(512))])
            .await
            .unwrap();
        store.remove_many(&["userData"]).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Entries = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();

        let err = store.get("userToken").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_writes_replace_a_truncated_file() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());
        std::fs::write(store.path(), r#"{"userToken": "ab"#).unwrap();

        store
            .set_many(&[("userToken", "fresh".to_string())])
            .await
            .unwrap();
        assert_eq!(store.get("userToken").await.unwrap().as_deref(), Some("fresh"));

        std::fs::write(store.path(), "{").unwrap();
        store.remove_many(&["userToken", "userData"]).await.unwrap();
        assert_eq!(store.get("userToken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::in_dir(dir.path());
        store
            .set_many(&[("userToken", "abc".to_string())])
            .await
            .unwrap();

        assert!(!dir.path().join("storage.json.tmp").exists());
        let content = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Entries = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.get("userToken").map(String::as_str), Some("abc"));
    }
}
