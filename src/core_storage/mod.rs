//! Everything the session core needs to touch stored data: virtual path
//! containment, the pluggable backend it calls through, and the host hooks
//! that may take over individual operations.

pub mod backend;
pub mod error;
pub mod filesystem;
pub mod hooks;
pub mod path;

pub use backend::{BoxAsyncRead, BoxAsyncWrite, DirEntry, Metadata, StorageBackend};
pub use error::{PathError, StorageError};
pub use filesystem::LocalFilesystem;
pub use hooks::{DownloadRequest, Handlers, ListFormat, ListRequest, RenameRequest, UploadRequest};
