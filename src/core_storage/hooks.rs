//! Optional host callbacks that take over individual storage operations.
//!
//! Each hook is an async closure. When one is registered, the session core
//! still enforces path containment and permission flags but no longer checks
//! the storage backend for the files involved.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type HookFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;
type Hook<Req, T> = Arc<dyn Fn(Req) -> HookFuture<T> + Send + Sync>;

/// A completed STOR, buffered in full.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub username: String,
    /// Virtual directory the client was in.
    pub path: String,
    pub file_name: String,
    pub data: Vec<u8>,
    pub offset: u64,
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub username: String,
    pub path: String,
    pub file_name: String,
    pub offset: u64,
}

#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub username: String,
    pub path: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    List,
    Mlsd,
}

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub username: String,
    pub path: String,
    pub format: ListFormat,
}

#[derive(Clone, Default)]
pub struct Handlers {
    upload: Option<Hook<UploadRequest, bool>>,
    download: Option<Hook<DownloadRequest, Vec<u8>>>,
    rename: Option<Hook<RenameRequest, bool>>,
    list: Option<Hook<ListRequest, Vec<u8>>>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("upload", &self.upload.is_some())
            .field("download", &self.download.is_some())
            .field("rename", &self.rename.is_some())
            .field("list", &self.list.is_some())
            .finish()
    }
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hook returns whether the upload was accepted.
    pub fn on_upload<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(UploadRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        self.upload = Some(Arc::new(move |req| Box::pin(hook(req))));
        self
    }

    /// The hook returns the bytes to send, already starting at the offset.
    pub fn on_download<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(DownloadRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        self.download = Some(Arc::new(move |req| Box::pin(hook(req))));
        self
    }

    pub fn on_rename<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(RenameRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        self.rename = Some(Arc::new(move |req| Box::pin(hook(req))));
        self
    }

    /// The hook returns the raw listing written to the data channel.
    pub fn on_list<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(ListRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        self.list = Some(Arc::new(move |req| Box::pin(hook(req))));
        self
    }

    pub fn has_upload(&self) -> bool {
        self.upload.is_some()
    }

    pub fn has_download(&self) -> bool {
        self.download.is_some()
    }

    pub fn has_rename(&self) -> bool {
        self.rename.is_some()
    }

    pub fn has_list(&self) -> bool {
        self.list.is_some()
    }

    /// `None` when no upload hook is registered.
    pub async fn upload(&self, req: UploadRequest) -> Option<anyhow::Result<bool>> {
        match &self.upload {
            Some(hook) => Some(hook(req).await),
            None => None,
        }
    }

    pub async fn download(&self, req: DownloadRequest) -> Option<anyhow::Result<Vec<u8>>> {
        match &self.download {
            Some(hook) => Some(hook(req).await),
            None => None,
        }
    }

    pub async fn rename(&self, req: RenameRequest) -> Option<anyhow::Result<bool>> {
        match &self.rename {
            Some(hook) => Some(hook(req).await),
            None => None,
        }
    }

    pub async fn list(&self, req: ListRequest) -> Option<anyhow::Result<Vec<u8>>> {
        match &self.list {
            Some(hook) => Some(hook(req).await),
            None => None,
        }
    }
}
