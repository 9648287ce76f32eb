//! An embeddable FTP/FTPS server engine.
//!
//! A host builds a [`Server`] from a [`Config`], optionally installs
//! [`Handlers`] or a custom [`StorageBackend`], and calls
//! [`Server::start`]. Each accepted control connection runs in its own
//! task until the client quits or the server is stopped.

pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod core_storage;
pub mod core_tls;
pub mod core_transfer;
pub mod session;

pub use config::{AnonymousConfig, Config, Permissions, ServerConfig, UserConfig};
pub use core_log::{ServerEvent, Transport};
pub use core_network::{Server, ServerBuilder, ServerError};
pub use core_storage::{
    DirEntry, DownloadRequest, Handlers, ListFormat, ListRequest, LocalFilesystem, Metadata,
    RenameRequest, StorageBackend, StorageError, UploadRequest,
};
pub use core_tls::TlsConfig;
