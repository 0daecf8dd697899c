//! File-backed entity store.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::EntityStore;
use crate::error::{StorageError, StorageResult};
use crate::filesystem::FileSystem;

const RECORD_EXTENSION: &str = ".json";

/// On-disk layout of one record.
#[derive(Serialize)]
struct RecordRef<'a, T> {
    id: &'a str,
    item: &'a T,
}

#[derive(Deserialize)]
struct Record<T> {
    id: String,
    item: T,
}

#[derive(Deserialize)]
struct RecordHeader {
    id: String,
}

/// [`EntityStore`] keeping one JSON file per item in a directory.
///
/// Each file is named after the SHA-256 digest of the item id, so names have
/// a fixed length whatever the id, and holds `{"id": ..., "item": ...}`.
/// Every access goes through `F`; pairing the store with a
/// [`crate::DynamicVaultFilesystem`] and a relative `dir` scopes it to the
/// active vault.
///
/// `list` and `ids` return items ordered by file name.
#[derive(Debug)]
pub struct FileStore<T, F> {
    fs: F,
    dir: PathBuf,
    _item: PhantomData<fn() -> T>,
}

impl<T, F: FileSystem> FileStore<T, F> {
    /// Creates a store over `dir`. The directory is created on first write.
    pub fn new(fs: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
            _item: PhantomData,
        }
    }

    /// The directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `id`.
    pub fn record_path(&self, id: &str) -> PathBuf {
        let digest = Sha256::digest(id.as_bytes());
        self.dir
            .join(format!("{}{RECORD_EXTENSION}", hex::encode(digest)))
    }

    /// Record files in the directory, ordered by name.
    fn record_files(&self) -> StorageResult<Vec<PathBuf>> {
        if !self.fs.exists(&self.dir)? {
            return Ok(Vec::new());
        }
        Ok(self
            .fs
            .read_dir(&self.dir)?
            .iter()
            .filter(|name| name.ends_with(RECORD_EXTENSION))
            .map(|name| self.dir.join(name))
            .collect())
    }

    fn read_record<R: DeserializeOwned>(&self, path: &Path, what: &str) -> StorageResult<R> {
        let json = self.fs.read_file(path)?;
        serde_json::from_str(&json).map_err(|err| {
            let dir = self.dir.display();
            StorageError::serialization(format!("record {what} in {dir}: {err}"))
        })
    }
}

impl<T, F> EntityStore<T> for FileStore<T, F>
where
    T: Serialize + DeserializeOwned,
    F: FileSystem,
{
    fn exists(&self, id: &str) -> StorageResult<bool> {
        self.fs.exists(&self.record_path(id))
    }

    fn create(&self, id: &str, item: &T) -> StorageResult<()> {
        let path = self.record_path(id);
        if self.fs.exists(&path)? {
            return Err(StorageError::AlreadyExists(id.to_string()));
        }
        let json = serde_json::to_string_pretty(&RecordRef { id, item })?;
        self.fs.ensure_dir(&self.dir)?;
        self.fs.write_file(&path, &json)?;
        log::debug!("stored record {id} in {}", self.dir.display());
        Ok(())
    }

    fn get(&self, id: &str) -> StorageResult<Option<T>> {
        let path = self.record_path(id);
        if !self.fs.exists(&path)? {
            return Ok(None);
        }
        let record: Record<T> = self.read_record(&path, id)?;
        if record.id != id {
            return Err(StorageError::serialization(format!(
                "record file for {id} holds {}",
                record.id
            )));
        }
        Ok(Some(record.item))
    }

    fn delete(&self, id: &str) -> StorageResult<bool> {
        let path = self.record_path(id);
        if !self.fs.exists(&path)? {
            return Ok(false);
        }
        self.fs.delete_file(&path)?;
        Ok(true)
    }

    fn ids(&self) -> StorageResult<Vec<String>> {
        self.record_files()?
            .iter()
            .map(|path| -> StorageResult<_> {
                let header: RecordHeader = self.read_record(path, &path.display().to_string())?;
                Ok(header.id)
            })
            .collect()
    }

    fn list(&self) -> StorageResult<Vec<T>> {
        self.record_files()?
            .iter()
            .map(|path| -> StorageResult<_> {
                let record: Record<T> = self.read_record(path, &path.display().to_string())?;
                Ok(record.item)
            })
            .collect()
    }
}
