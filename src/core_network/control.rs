use crate::constants::MAX_COMMAND_LENGTH;
use crate::core_log::EventSink;
use crate::core_tls::{TlsConnection, TlsError};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::server::TlsStream;

enum ControlStream {
    Plain(BufReader<TcpStream>),
    Tls(Box<BufReader<TlsStream<TcpStream>>>),
    /// Left behind after a failed upgrade or after the connection was ended.
    Closed,
}

/// The command/reply side of a connection. AUTH swaps the stream underneath
/// from plain to TLS without touching the session.
pub struct ControlChannel {
    stream: ControlStream,
    connection_info: String,
    events: EventSink,
    closing: bool,
}

impl ControlChannel {
    pub fn plain(stream: TcpStream, peer_addr: SocketAddr, events: EventSink) -> Self {
        Self {
            stream: ControlStream::Plain(BufReader::new(stream)),
            connection_info: format!("[{}] [{}]", peer_addr.ip(), peer_addr.port()),
            events,
            closing: false,
        }
    }

    pub fn tls(stream: TlsStream<TcpStream>, peer_addr: SocketAddr, events: EventSink) -> Self {
        Self {
            stream: ControlStream::Tls(Box::new(BufReader::new(stream))),
            connection_info: format!("[{}] [{}]", peer_addr.ip(), peer_addr.port()),
            events,
            closing: false,
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self.stream, ControlStream::Tls(_))
    }

    /// Set once a reply that ends the connection has been written.
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Reads one command line. Returns `None` when the client has gone away.
    /// A line longer than the command limit is drained up to its newline and
    /// comes back as an `InvalidData` error.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buffer = Vec::new();
        let n = self.read_bounded(&mut buffer).await?;
        if n == 0 {
            return Ok(None);
        }
        if n == MAX_COMMAND_LENGTH && buffer.last() != Some(&b'\n') {
            loop {
                buffer.clear();
                if self.read_bounded(&mut buffer).await? == 0 || buffer.last() == Some(&b'\n') {
                    break;
                }
            }
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "command line too long",
            ));
        }
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }

    async fn read_bounded(&mut self, buffer: &mut Vec<u8>) -> io::Result<usize> {
        let limit = MAX_COMMAND_LENGTH as u64;
        match &mut self.stream {
            ControlStream::Plain(reader) => {
                (&mut *reader).take(limit).read_until(b'\n', buffer).await
            }
            ControlStream::Tls(reader) => {
                (&mut **reader).take(limit).read_until(b'\n', buffer).await
            }
            ControlStream::Closed => Ok(0),
        }
    }

    /// Resolves once the client has sent something or hung up, without
    /// consuming any input. Returns `false` on EOF or a read error.
    /// Safe to cancel.
    pub async fn wait_for_input(&mut self) -> bool {
        let filled = match &mut self.stream {
            ControlStream::Plain(reader) => reader.fill_buf().await.map(|b| !b.is_empty()),
            ControlStream::Tls(reader) => reader.fill_buf().await.map(|b| !b.is_empty()),
            ControlStream::Closed => Ok(false),
        };
        filled.unwrap_or(false)
    }

    async fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        match &mut self.stream {
            ControlStream::Plain(reader) => {
                let stream = reader.get_mut();
                stream.write_all(data).await?;
                stream.flush().await
            }
            ControlStream::Tls(reader) => {
                let stream = reader.get_mut();
                stream.write_all(data).await?;
                stream.flush().await
            }
            ControlStream::Closed => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "control connection closed",
            )),
        }
    }

    /// Writes `<code> <message>\r\n`.
    pub async fn write_reply(&mut self, code: u16, message: &str) -> io::Result<()> {
        self.events
            .log(&format!("{} > {} {}", self.connection_info, code, message));
        self.write_raw(format!("{} {}\r\n", code, message).as_bytes())
            .await
    }

    /// Writes the reply, then ends the connection.
    pub async fn write_reply_and_close(&mut self, code: u16, message: &str) -> io::Result<()> {
        let result = self.write_reply(code, message).await;
        self.close().await;
        result
    }

    /// Writes `<code>-<first>`, each of `lines` as is, then `<code> <last>`.
    pub async fn write_multiline(
        &mut self,
        code: u16,
        first: &str,
        lines: &[String],
        last: &str,
    ) -> io::Result<()> {
        let mut reply = format!("{}-{}\r\n", code, first);
        for line in lines {
            reply.push_str(line);
            reply.push_str("\r\n");
        }
        reply.push_str(&format!("{} {}\r\n", code, last));
        self.events.log(&format!(
            "{} > {}",
            self.connection_info,
            reply.trim_end()
        ));
        self.write_raw(reply.as_bytes()).await
    }

    /// Runs the server side of a TLS handshake on the existing connection.
    /// Any bytes the client pipelined after AUTH are discarded. Callers check
    /// `is_secure` first; a channel that is already TLS is left untouched.
    pub async fn upgrade(&mut self, tls: &TlsConnection) -> Result<(), TlsError> {
        match std::mem::replace(&mut self.stream, ControlStream::Closed) {
            ControlStream::Plain(reader) => {
                let stream = tls.accept_tls(reader.into_inner()).await?;
                self.stream = ControlStream::Tls(Box::new(BufReader::new(stream)));
                self.events.debug(&format!(
                    "{} secure connection established",
                    self.connection_info
                ));
                Ok(())
            }
            other => {
                self.stream = other;
                Ok(())
            }
        }
    }

    pub async fn close(&mut self) {
        self.closing = true;
        match std::mem::replace(&mut self.stream, ControlStream::Closed) {
            ControlStream::Plain(mut reader) => {
                let _ = reader.get_mut().shutdown().await;
            }
            ControlStream::Tls(mut reader) => {
                let _ = reader.get_mut().shutdown().await;
            }
            ControlStream::Closed => {}
        }
    }
}
