use crate::core_tls::{TlsConnection, TlsError};
use log::debug;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::server::TlsStream;

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("No data connection mode selected")]
    NotArmed,

    #[error("Data connection failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Tls(#[from] TlsError),
}

/// How the next data connection gets established.
#[derive(Debug, Default)]
pub enum DataMode {
    #[default]
    None,
    /// PORT/EPRT: connect out to the client.
    Active(SocketAddr),
    /// PASV/EPSV: accept on a listener owned by this session.
    Passive(TcpListener),
}

/// One data connection per PASV/EPSV/PORT/EPRT. Arming a new mode drops
/// whatever listener the previous one held.
#[derive(Debug, Default)]
pub struct DataChannel {
    mode: DataMode,
}

impl DataChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self.mode, DataMode::None)
    }

    pub fn set_active(&mut self, addr: SocketAddr) {
        self.mode = DataMode::Active(addr);
    }

    pub fn set_passive(&mut self, listener: TcpListener) {
        self.mode = DataMode::Passive(listener);
    }

    pub fn reset(&mut self) {
        self.mode = DataMode::None;
    }

    /// Establishes the data connection, wrapping it in TLS when `tls` is
    /// given. The armed mode is consumed either way.
    pub async fn open(&mut self, tls: Option<&TlsConnection>) -> Result<DataStream, DataChannelError> {
        let stream = match std::mem::take(&mut self.mode) {
            DataMode::None => return Err(DataChannelError::NotArmed),
            DataMode::Active(addr) => {
                debug!("Connecting data channel to {}", addr);
                TcpStream::connect(addr).await?
            }
            DataMode::Passive(listener) => {
                let (stream, addr) = listener.accept().await?;
                debug!("Accepted data connection from {}", addr);
                stream
            }
        };

        match tls {
            Some(tls) => Ok(DataStream::Tls(Box::new(tls.accept_tls(stream).await?))),
            None => Ok(DataStream::Plain(stream)),
        }
    }
}

pub enum DataStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for DataStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DataStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            DataStream::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for DataStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            DataStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            DataStream::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DataStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            DataStream::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            DataStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            DataStream::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}
