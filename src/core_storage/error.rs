// Storage and path containment errors
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is outside of the allowed area: {0}")]
    Containment(String),
}
