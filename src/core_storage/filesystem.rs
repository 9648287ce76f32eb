use crate::core_storage::backend::{BoxAsyncRead, BoxAsyncWrite, DirEntry, Metadata, StorageBackend};
use crate::core_storage::error::StorageError;
use async_trait::async_trait;
use filetime::{set_file_mtime, FileTime};
use log::warn;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncSeekExt;

/// StorageBackend over the local filesystem, like a traditional FTP server.
#[derive(Debug, Default, Clone)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

fn to_metadata(metadata: &std::fs::Metadata) -> Metadata {
    Metadata {
        len: metadata.len(),
        is_dir: metadata.is_dir(),
        modified: metadata.modified().unwrap_or(UNIX_EPOCH),
    }
}

#[async_trait]
impl StorageBackend for LocalFilesystem {
    async fn metadata(&self, path: &Path) -> Result<Metadata, StorageError> {
        let metadata = fs::metadata(path).await?;
        Ok(to_metadata(&metadata))
    }

    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>, StorageError> {
        if !fs::metadata(path).await?.is_dir() {
            return Err(StorageError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().trim().to_string();
            // Follows symlinks, so a link is listed as whatever it points at.
            match fs::metadata(entry.path()).await {
                Ok(metadata) => entries.push(DirEntry {
                    name,
                    metadata: to_metadata(&metadata),
                }),
                Err(e) => {
                    warn!(
                        "Failed to get metadata for entry: {:?}, error: {:?}",
                        entry.path(),
                        e
                    );
                }
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn get(&self, path: &Path, start_pos: u64) -> Result<BoxAsyncRead, StorageError> {
        let mut file = File::open(path).await?;
        if !file.metadata().await?.is_file() {
            return Err(StorageError::NotAFile(path.to_path_buf()));
        }
        if start_pos > 0 {
            file.seek(SeekFrom::Start(start_pos)).await?;
        }
        Ok(Box::new(file))
    }

    async fn put(&self, path: &Path, append: bool) -> Result<BoxAsyncWrite, StorageError> {
        let mut options = OpenOptions::new();
        if append {
            options.append(true).create(true);
        } else {
            options.write(true).create(true).truncate(true);
        }
        let file = options.open(path).await?;
        Ok(Box::new(file))
    }

    async fn del(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn mkd(&self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn rmd(&self, path: &Path) -> Result<(), StorageError> {
        fs::remove_dir_all(path).await?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        fs::rename(from, to).await?;
        Ok(())
    }

    async fn set_modified(&self, path: &Path, modified: SystemTime) -> Result<(), StorageError> {
        let path: PathBuf = path.to_path_buf();
        let filetime = FileTime::from_system_time(modified);
        tokio::task::spawn_blocking(move || set_file_mtime(&path, filetime))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn put_then_get_from_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let storage = LocalFilesystem::new();

        let mut writer = storage.put(&path, false).await.unwrap();
        writer.write_all(b"SOMETESTCONTENT").await.unwrap();
        writer.shutdown().await.unwrap();

        let mut reader = storage.get(&path, 4).await.unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "TESTCONTENT");
        assert_eq!(storage.metadata(&path).await.unwrap().len, 15);
    }

    #[tokio::test]
    async fn append_mode_keeps_existing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, b"abc").unwrap();
        let storage = LocalFilesystem::new();

        let mut writer = storage.put(&path, true).await.unwrap();
        writer.write_all(b"def").await.unwrap();
        writer.shutdown().await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abcdef");

        let mut writer = storage.put(&path, false).await.unwrap();
        writer.write_all(b"x").await.unwrap();
        writer.shutdown().await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }

    #[tokio::test]
    async fn list_is_sorted_and_single_level() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"12").unwrap();
        std::fs::create_dir_all(dir.path().join("a/nested")).unwrap();
        let storage = LocalFilesystem::new();

        let entries = storage.list(dir.path()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b.txt"]);
        assert!(entries[0].metadata.is_dir);
        assert_eq!(entries[1].metadata.len, 2);
    }

    #[tokio::test]
    async fn set_modified_updates_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"").unwrap();
        let storage = LocalFilesystem::new();

        let when = UNIX_EPOCH + Duration::from_secs(1_423_958_400);
        storage.set_modified(&path, when).await.unwrap();
        assert_eq!(storage.metadata(&path).await.unwrap().modified, when);
    }

    #[tokio::test]
    async fn directory_helpers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFilesystem::new();
        let nested = dir.path().join("x/y");

        storage.mkd(&nested).await.unwrap();
        assert!(storage.is_dir(&nested).await);
        assert!(!storage.is_file(&nested).await);

        storage.rmd(&dir.path().join("x")).await.unwrap();
        assert!(!storage.exists(&nested).await);
    }
}
