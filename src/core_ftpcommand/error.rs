// FTP command error handling
use crate::core_storage::{PathError, StorageError};
use crate::core_tls::TlsError;
use std::io;
use thiserror::Error;

/// Every way a command can fail. The connection loop turns each into exactly
/// one numbered reply and decides whether the connection survives.
#[derive(Error, Debug)]
pub enum FtpError {
    /// Malformed arguments or a command out of sequence.
    #[error("{code} {message}")]
    Protocol { code: u16, message: String },

    /// Bad credentials or a command that needs a login.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Permission denied")]
    PermissionDenied,

    /// Containment violation, missing target or wrong file type.
    #[error("{code} {message}")]
    Path { code: u16, message: String },

    #[error("{code} {message}")]
    Transfer { code: u16, message: String },

    /// Unexpected failure while handling a command.
    #[error("{0}")]
    Internal(String),

    /// The control connection itself is gone.
    #[error("Control connection error: {0}")]
    Connection(#[from] io::Error),
}

impl FtpError {
    pub fn protocol(code: u16, message: impl Into<String>) -> Self {
        FtpError::Protocol {
            code,
            message: message.into(),
        }
    }

    pub fn path(code: u16, message: impl Into<String>) -> Self {
        FtpError::Path {
            code,
            message: message.into(),
        }
    }

    pub fn transfer(code: u16, message: impl Into<String>) -> Self {
        FtpError::Transfer {
            code,
            message: message.into(),
        }
    }

    /// The reply to send, or `None` when the control connection is unusable.
    pub fn to_ftp_response(&self) -> Option<(u16, String)> {
        match self {
            FtpError::Protocol { code, message }
            | FtpError::Path { code, message }
            | FtpError::Transfer { code, message } => Some((*code, message.clone())),
            FtpError::Auth(message) => Some((530, message.clone())),
            FtpError::PermissionDenied => Some((550, "Permission denied".to_string())),
            FtpError::Internal(message) => Some((550, message.clone())),
            FtpError::Connection(_) => None,
        }
    }

    pub fn closes_connection(&self) -> bool {
        matches!(
            self,
            FtpError::Auth(_) | FtpError::Internal(_) | FtpError::Connection(_)
        )
    }
}

impl From<StorageError> for FtpError {
    fn from(err: StorageError) -> Self {
        FtpError::Internal(err.to_string())
    }
}

impl From<TlsError> for FtpError {
    fn from(err: TlsError) -> Self {
        FtpError::Internal(err.to_string())
    }
}

impl From<PathError> for FtpError {
    fn from(_: PathError) -> Self {
        FtpError::path(550, "File not found")
    }
}
