use crate::config::Permissions;
use crate::core_auth::Grant;
use crate::core_network::data_channel::DataChannel;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Ascii,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// USER accepted, waiting for PASS.
    PasswordPending,
    /// Terminal until the connection closes.
    Authenticated,
}

/// Per-connection protocol state, owned by the connection's task.
#[derive(Debug)]
pub struct Session {
    pub peer_addr: SocketAddr,
    pub local_addr: SocketAddr,
    pub auth_state: AuthState,
    pub username: Option<String>,
    /// Control channel is TLS (implicit listener or after AUTH).
    pub secure: bool,
    pub pbsz_completed: bool,
    /// PROT P: wrap data connections in TLS while `secure`.
    pub protection: bool,
    /// Absolute folder every virtual path is resolved against.
    pub root: PathBuf,
    /// Virtual working directory, always starting and ending with `/`.
    pub cwd: String,
    /// Set by RNFR: the resolved source and the argument as the client sent it.
    pub rename_from: Option<(PathBuf, String)>,
    pub restart_offset: u64,
    pub transfer_type: TransferType,
    pub permissions: Permissions,
    pub data_channel: DataChannel,
}

impl Session {
    pub fn new(peer_addr: SocketAddr, local_addr: SocketAddr, root: PathBuf, secure: bool) -> Self {
        Self {
            peer_addr,
            local_addr,
            auth_state: AuthState::Unauthenticated,
            username: None,
            secure,
            pbsz_completed: false,
            protection: false,
            root,
            cwd: String::from("/"),
            rename_from: None,
            restart_offset: 0,
            transfer_type: TransferType::Binary,
            permissions: Permissions::deny_all(),
            data_channel: DataChannel::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_state == AuthState::Authenticated
    }

    /// The `[ip] [port]` prefix of every log line about this connection.
    pub fn connection_info(&self) -> String {
        format!("[{}] [{}]", self.peer_addr.ip(), self.peer_addr.port())
    }

    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    /// Stores the resolved permission snapshot and root; never recomputed
    /// for the rest of the session.
    pub fn apply_grant(&mut self, grant: Grant) {
        self.permissions = grant.permissions;
        self.root = grant.root;
        self.cwd = String::from("/");
        self.auth_state = AuthState::Authenticated;
    }

    /// Returns the pending restart offset and resets it to 0.
    pub fn take_restart_offset(&mut self) -> u64 {
        std::mem::take(&mut self.restart_offset)
    }

    pub fn take_rename_from(&mut self) -> Option<(PathBuf, String)> {
        self.rename_from.take()
    }

    pub fn is_ascii(&self) -> bool {
        self.transfer_type == TransferType::Ascii
    }

    /// Data connections get TLS only when both the control channel is
    /// secure and PROT P is in effect.
    pub fn protect_data(&self) -> bool {
        self.secure && self.protection
    }
}
