use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

/// Tracks every running session task so shutdown can close them all.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: Mutex<HashMap<u64, AbortHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Spawns a session task that removes itself from the registry when it
    /// ends. The lock is held until the handle is stored, so removal always
    /// happens after insertion.
    pub async fn spawn<F>(self: &Arc<Self>, session: F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut sessions = self.sessions.lock().await;
        let registry = Arc::clone(self);
        let handle = tokio::spawn(async move {
            session.await;
            registry.sessions.lock().await.remove(&id);
        });
        sessions.insert(id, handle.abort_handle());
        id
    }

    /// Aborts every tracked session. Dropping an aborted task closes the
    /// sockets it owned.
    pub async fn abort_all(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let count = sessions.len();
        for (_, handle) in sessions.drain() {
            handle.abort();
        }
        count
    }
}
