use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::core_log::logger::timestamped;
use log::{debug, error, info};
use std::io;
use std::net::SocketAddr;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Tls,
}

/// Events a host process can observe through [`crate::Server::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Listening { transport: Transport, addr: SocketAddr },
    Log(String),
    Debug(String),
    Error(String),
}

/// Fans diagnostics out to the `log` facade and to subscribed hosts.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: broadcast::Sender<ServerEvent>,
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    // Sending fails only when nobody is subscribed, which is fine.
    fn emit(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    pub fn listening(&self, transport: Transport, addr: SocketAddr) {
        info!("FTP server listening on {} ({:?})", addr, transport);
        self.emit(ServerEvent::Listening { transport, addr });
    }

    pub fn log(&self, message: &str) {
        info!("{}", message);
        self.emit(ServerEvent::Log(timestamped(message)));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", message);
        self.emit(ServerEvent::Debug(timestamped(message)));
    }

    /// Reports a socket error unless it is the expected connection-reset noise.
    pub fn socket_error(&self, context: &str, err: &io::Error) {
        if err.kind() == io::ErrorKind::ConnectionReset {
            return;
        }
        error!("{}: {}", context, err);
        self.emit(ServerEvent::Error(format!("{}: {}", context, err)));
    }

    pub fn error(&self, message: &str) {
        error!("{}", message);
        self.emit(ServerEvent::Error(message.to_string()));
    }
}
