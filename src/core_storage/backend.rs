//! Contains the `StorageBackend` trait the session core calls through for
//! every stat, read, write, rename, delete and directory operation.

use crate::core_storage::error::StorageError;
use async_trait::async_trait;
use std::path::Path;
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncWrite};

pub type BoxAsyncRead = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxAsyncWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// Represents the metadata of a file or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub len: u64,
    pub is_dir: bool,
    pub modified: SystemTime,
}

impl Metadata {
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}

/// A single entry of a (non-recursive) directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub metadata: Metadata,
}

/// All paths handed to a backend are absolute and have already passed the
/// containment check; backends do not re-validate them.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the `Metadata` for the given path.
    async fn metadata(&self, path: &Path) -> Result<Metadata, StorageError>;

    async fn exists(&self, path: &Path) -> bool {
        self.metadata(path).await.is_ok()
    }

    async fn is_file(&self, path: &Path) -> bool {
        matches!(self.metadata(path).await, Ok(metadata) if metadata.is_file())
    }

    async fn is_dir(&self, path: &Path) -> bool {
        matches!(self.metadata(path).await, Ok(metadata) if metadata.is_dir)
    }

    /// Returns the entries of the given directory, one level deep.
    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>, StorageError>;

    /// Returns the content of the given file from offset `start_pos`.
    async fn get(&self, path: &Path, start_pos: u64) -> Result<BoxAsyncRead, StorageError>;

    /// Opens the given file for writing, appending when `append` is set and
    /// truncating (or creating) it otherwise.
    async fn put(&self, path: &Path, append: bool) -> Result<BoxAsyncWrite, StorageError>;

    /// Delete the given file.
    async fn del(&self, path: &Path) -> Result<(), StorageError>;

    /// Create the given directory, including missing parents.
    async fn mkd(&self, path: &Path) -> Result<(), StorageError>;

    /// Delete the given directory and everything below it.
    async fn rmd(&self, path: &Path) -> Result<(), StorageError>;

    /// Rename the given file.
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError>;

    /// Set the modification time of the given file.
    async fn set_modified(&self, path: &Path, modified: SystemTime) -> Result<(), StorageError>;
}
