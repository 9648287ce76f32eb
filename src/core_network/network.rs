use crate::config::{log_config, Config};
use crate::core_auth::AuthManager;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::handlers::{dispatch_command, split_command};
use crate::core_log::logger::redact_command;
use crate::core_log::{EventSink, ServerEvent, Transport};
use crate::core_network::control::ControlChannel;
use crate::core_network::registry::SessionRegistry;
use crate::core_storage::{Handlers, LocalFilesystem, StorageBackend};
use crate::core_tls::{TlsConnection, TlsError};
use crate::session::Session;
use log::{info, warn};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Base folder does not exist: {}", .0.display())]
    MissingBaseFolder(PathBuf),

    #[error("Failed to prepare base folder {}: {source}", .path.display())]
    BaseFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("Server is already running")]
    AlreadyRunning,
}

/// Shared, read-only state every session task works against.
pub struct ServerContext {
    pub config: Arc<Config>,
    pub auth: AuthManager,
    pub storage: Arc<dyn StorageBackend>,
    pub handlers: Handlers,
    pub tls: TlsConnection,
    pub events: EventSink,
}

pub struct ServerBuilder {
    config: Config,
    handlers: Handlers,
    storage: Option<Arc<dyn StorageBackend>>,
}

impl ServerBuilder {
    pub fn handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn storage<S: StorageBackend + 'static>(mut self, storage: S) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Prepares the base folder and TLS material. Nothing is bound yet.
    pub fn build(self) -> Result<Server, ServerError> {
        let mut config = self.config;
        let basefolder = absolute_basefolder(&config)?;

        if !self.handlers.has_upload() && !basefolder.exists() {
            if config.uses_default_basefolder() {
                std::fs::create_dir_all(&basefolder).map_err(|source| ServerError::BaseFolder {
                    path: basefolder.clone(),
                    source,
                })?;
                info!("Created default base folder {}", basefolder.display());
            } else {
                return Err(ServerError::MissingBaseFolder(basefolder));
            }
        }
        let uses_default_basefolder = config.uses_default_basefolder();
        if !uses_default_basefolder {
            config.server.basefolder = Some(basefolder.clone());
        }

        let tls = TlsConnection::new(&config.tls)?;
        let auth = AuthManager::new(&config, basefolder.clone());
        log_config(&config);

        let context = ServerContext {
            config: Arc::new(config),
            auth,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(LocalFilesystem::new())),
            handlers: self.handlers,
            tls,
            events: EventSink::new(),
        };

        Ok(Server {
            context: Arc::new(context),
            registry: SessionRegistry::new(),
            listeners: Vec::new(),
            local_addr: None,
            secure_addr: None,
            basefolder,
            uses_default_basefolder,
        })
    }
}

fn absolute_basefolder(config: &Config) -> Result<PathBuf, ServerError> {
    let basefolder = config.basefolder();
    if basefolder.is_absolute() {
        return Ok(basefolder);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&basefolder))
        .map_err(|source| ServerError::BaseFolder {
            path: basefolder,
            source,
        })
}

pub struct Server {
    context: Arc<ServerContext>,
    registry: Arc<SessionRegistry>,
    listeners: Vec<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
    secure_addr: Option<SocketAddr>,
    basefolder: PathBuf,
    uses_default_basefolder: bool,
}

impl Server {
    pub fn builder(config: Config) -> ServerBuilder {
        ServerBuilder {
            config,
            handlers: Handlers::default(),
            storage: None,
        }
    }

    pub fn new(config: Config) -> Result<Self, ServerError> {
        Self::builder(config).build()
    }

    /// Subscribe before `start` to see the listening events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.context.events.subscribe()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn secure_addr(&self) -> Option<SocketAddr> {
        self.secure_addr
    }

    pub fn basefolder(&self) -> &PathBuf {
        &self.basefolder
    }

    /// Binds the plain listener, plus the implicit TLS one when enabled, and
    /// starts accepting connections.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if !self.listeners.is_empty() {
            return Err(ServerError::AlreadyRunning);
        }

        let config = &self.context.config;
        let addr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), config.server.port);
        let listener = bind(addr).await?;
        let local_addr = listener.local_addr().unwrap_or(addr);
        self.context.events.listening(Transport::Tcp, local_addr);
        self.local_addr = Some(local_addr);
        self.listeners.push(tokio::spawn(accept_loop(
            listener,
            Arc::clone(&self.context),
            Arc::clone(&self.registry),
            false,
        )));

        if config.tls.enabled {
            let addr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), config.server.secure_port);
            let listener = bind(addr).await?;
            let secure_addr = listener.local_addr().unwrap_or(addr);
            self.context.events.listening(Transport::Tls, secure_addr);
            self.secure_addr = Some(secure_addr);
            self.listeners.push(tokio::spawn(accept_loop(
                listener,
                Arc::clone(&self.context),
                Arc::clone(&self.registry),
                true,
            )));
        }
        Ok(())
    }

    /// Closes every open session, then the listeners.
    pub async fn stop(&mut self) {
        let closed = self.registry.abort_all().await;
        info!("Closed {} open connection(s)", closed);
        for listener in self.listeners.drain(..) {
            listener.abort();
            let _ = listener.await;
        }
        self.local_addr = None;
        self.secure_addr = None;
    }

    /// Removes the base folder, but only the one the server created itself.
    pub async fn cleanup(&self) -> io::Result<()> {
        if !self.uses_default_basefolder {
            return Ok(());
        }
        match tokio::fs::remove_dir_all(&self.basefolder).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

async fn accept_loop(
    listener: TcpListener,
    context: Arc<ServerContext>,
    registry: Arc<SessionRegistry>,
    implicit_tls: bool,
) {
    loop {
        let (socket, peer_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                context.events.socket_error("Failed to accept connection", &e);
                continue;
            }
        };

        if registry.len().await >= context.config.server.max_connections {
            warn!("Refusing connection from {}: too many connections", peer_addr);
            tokio::spawn(reject_connection(socket, peer_addr, Arc::clone(&context), implicit_tls));
            continue;
        }

        registry
            .spawn(handle_connection(
                socket,
                peer_addr,
                Arc::clone(&context),
                implicit_tls,
            ))
            .await;
    }
}

async fn open_control_channel(
    socket: TcpStream,
    peer_addr: SocketAddr,
    context: &ServerContext,
    implicit_tls: bool,
) -> Option<ControlChannel> {
    if !implicit_tls {
        return Some(ControlChannel::plain(socket, peer_addr, context.events.clone()));
    }
    match context.tls.accept_tls(socket).await {
        Ok(stream) => Some(ControlChannel::tls(stream, peer_addr, context.events.clone())),
        Err(e) => {
            context
                .events
                .debug(&format!("[{}] [{}] {}", peer_addr.ip(), peer_addr.port(), e));
            None
        }
    }
}

async fn reject_connection(
    socket: TcpStream,
    peer_addr: SocketAddr,
    context: Arc<ServerContext>,
    implicit_tls: bool,
) {
    if let Some(mut writer) = open_control_channel(socket, peer_addr, &context, implicit_tls).await {
        let _ = writer
            .write_reply_and_close(421, "Too many connections. Try again later.")
            .await;
    }
}

/// Runs one control connection until the client leaves or a reply ends it.
pub async fn handle_connection(
    socket: TcpStream,
    peer_addr: SocketAddr,
    context: Arc<ServerContext>,
    implicit_tls: bool,
) {
    let local_addr = match socket.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            context.events.socket_error("Failed to read local address", &e);
            return;
        }
    };
    let Some(mut writer) = open_control_channel(socket, peer_addr, &context, implicit_tls).await
    else {
        return;
    };

    let mut session = Session::new(
        peer_addr,
        local_addr,
        context.auth.default_root().to_path_buf(),
        writer.is_secure(),
    );
    let connection_info = session.connection_info();
    context
        .events
        .debug(&format!("{} new FTP connection established", connection_info));

    if let Err(e) = writer.write_reply(220, "Welcome").await {
        context.events.socket_error(&connection_info, &e);
        return;
    }

    loop {
        let line = match writer.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                if let Err(e) = writer.write_reply(500, "Command line too long").await {
                    context.events.socket_error(&connection_info, &e);
                    break;
                }
                continue;
            }
            Err(e) => {
                context.events.socket_error(&connection_info, &e);
                break;
            }
        };

        let logged = redact_command(&line);
        context
            .events
            .log(&format!("{} < {}", connection_info, logged));
        let (verb, arg) = split_command(&line);
        context.events.debug(&format!(
            "{} cmd[{}] arg[{}]",
            connection_info,
            verb,
            if logged.starts_with("PASS ***") { "***" } else { arg }
        ));

        if let Err(e) = dispatch_command(&mut writer, &context, &mut session, verb, arg).await {
            if !report_error(&mut writer, &context, &connection_info, &e).await {
                break;
            }
        }
        if writer.is_closing() {
            break;
        }
    }

    writer.close().await;
    context
        .events
        .debug(&format!("{} FTP connection closed", connection_info));
}

/// Sends the single reply for a failed command. Returns whether the
/// connection stays open.
async fn report_error(
    writer: &mut ControlChannel,
    context: &ServerContext,
    connection_info: &str,
    err: &FtpError,
) -> bool {
    let Some((code, message)) = err.to_ftp_response() else {
        if let FtpError::Connection(e) = err {
            context.events.socket_error(connection_info, e);
        }
        return false;
    };

    if let FtpError::Internal(message) = err {
        context
            .events
            .error(&format!("{} {}", connection_info, message));
    }

    let written = if err.closes_connection() {
        writer.write_reply_and_close(code, &message).await
    } else {
        writer.write_reply(code, &message).await
    };
    match written {
        Ok(()) => !err.closes_connection(),
        Err(e) => {
            context.events.socket_error(connection_info, &e);
            false
        }
    }
}
