//! Local disk backend.

use std::io;
use std::path::Path;

use async_trait::async_trait;

use super::{AsyncFileSystem, FileSystem};
use crate::error::{StorageError, StorageResult};

/// [`FileSystem`] and [`AsyncFileSystem`] over the local disk, using
/// `std::fs` and `tokio::fs` respectively.
///
/// `chmod` changes Unix permission bits and only checks that the path exists
/// on other platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Creates the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn map_io(context: &str, path: &Path, err: io::Error) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::not_found(path.display().to_string())
    } else {
        StorageError::io(format!("{context} {}", path.display()), err)
    }
}

fn missing_dir_is_ok(path: &Path, result: io::Result<()>) -> StorageResult<()> {
    match result {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            Err(map_io("deleting directory", path, err))
        }
        _ => Ok(()),
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> StorageResult<bool> {
        path.try_exists()
            .map_err(|err| map_io("checking", path, err))
    }

    fn read_file(&self, path: &Path) -> StorageResult<String> {
        std::fs::read_to_string(path).map_err(|err| map_io("reading", path, err))
    }

    fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        std::fs::write(path, data).map_err(|err| map_io("writing", path, err))
    }

    fn delete_file(&self, path: &Path) -> StorageResult<()> {
        std::fs::remove_file(path).map_err(|err| map_io("deleting", path, err))
    }

    fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        missing_dir_is_ok(path, std::fs::remove_dir_all(path))
    }

    fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|err| map_io("listing", path, err))? {
            let entry = entry.map_err(|err| map_io("listing", path, err))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        std::fs::create_dir_all(path).map_err(|err| map_io("creating directory", path, err))
    }

    #[cfg(unix)]
    fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|err| map_io("changing permissions of", path, err))
    }

    #[cfg(not(unix))]
    fn chmod(&self, path: &Path, _mode: u32) -> StorageResult<()> {
        std::fs::metadata(path)
            .map(|_| ())
            .map_err(|err| map_io("changing permissions of", path, err))
    }
}

#[async_trait]
impl AsyncFileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> StorageResult<bool> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|err| map_io("checking", path, err))
    }

    async fn read_file(&self, path: &Path) -> StorageResult<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| map_io("reading", path, err))
    }

    async fn write_file(&self, path: &Path, data: &str) -> StorageResult<()> {
        tokio::fs::write(path, data)
            .await
            .map_err(|err| map_io("writing", path, err))
    }

    async fn delete_file(&self, path: &Path) -> StorageResult<()> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|err| map_io("deleting", path, err))
    }

    async fn delete_dir(&self, path: &Path) -> StorageResult<()> {
        missing_dir_is_ok(path, tokio::fs::remove_dir_all(path).await)
    }

    async fn read_dir(&self, path: &Path) -> StorageResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|err| map_io("listing", path, err))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| map_io("listing", path, err))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn ensure_dir(&self, path: &Path) -> StorageResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|err| map_io("creating directory", path, err))
    }

    #[cfg(unix)]
    async fn chmod(&self, path: &Path, mode: u32) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .await
            .map_err(|err| map_io("changing permissions of", path, err))
    }

    #[cfg(not(unix))]
    async fn chmod(&self, path: &Path, _mode: u32) -> StorageResult<()> {
        tokio::fs::metadata(path)
            .await
            .map(|_| ())
            .map_err(|err| map_io("changing permissions of", path, err))
    }
}
