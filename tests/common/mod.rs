#![allow(dead_code)]

use rouilleftpd_engine::{Config, Handlers, Server, UserConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// A server on an ephemeral control port, rooted in its own temp folder.
/// Every test passes its own data port range so parallel tests don't race
/// for the same passive ports.
pub struct TestServer {
    pub server: Server,
    pub dir: TempDir,
    /// Trusts the certificate the server was given.
    pub connector: TlsConnector,
    _certs: TempDir,
}

pub fn test_config(dir: &Path, min_data_port: u16) -> Config {
    let mut config = Config::default();
    config.server.port = 0;
    config.server.basefolder = Some(dir.to_path_buf());
    config.server.min_data_port = min_data_port;
    config.users = vec![UserConfig::without_password("john")];
    config
}

/// Writes a fresh `localhost` certificate and key under `dir` and returns a
/// client connector that trusts it.
pub fn tls_material(dir: &Path, config: &mut Config) -> TlsConnector {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_file = dir.join("cert.pem");
    let key_file = dir.join("key.pem");
    std::fs::write(&cert_file, certified.cert.pem()).unwrap();
    std::fs::write(&key_file, certified.key_pair.serialize_pem()).unwrap();
    config.tls.cert_file = Some(cert_file);
    config.tls.key_file = Some(key_file);

    let mut roots = rustls::RootCertStore::empty();
    roots
        .add(&rustls::Certificate(certified.cert.der().to_vec()))
        .unwrap();
    let client_config = rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(client_config))
}

fn localhost() -> rustls::ServerName {
    rustls::ServerName::try_from("localhost").unwrap()
}

impl TestServer {
    pub async fn start(min_data_port: u16) -> Self {
        Self::start_with(min_data_port, Handlers::default(), |_| {}).await
    }

    pub async fn start_with<F>(min_data_port: u16, handlers: Handlers, configure: F) -> Self
    where
        F: FnOnce(&mut Config),
    {
        let dir = tempfile::tempdir().unwrap();
        let certs = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path(), min_data_port);
        let connector = tls_material(certs.path(), &mut config);
        configure(&mut config);
        let mut server = Server::builder(config).handlers(handlers).build().unwrap();
        server.start().await.unwrap();
        Self {
            server,
            dir,
            connector,
            _certs: certs,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        let port = self.server.local_addr().unwrap().port();
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    /// Loopback address of the implicit TLS listener.
    pub fn secure_addr(&self) -> SocketAddr {
        let port = self.server.secure_addr().unwrap().port();
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub async fn connect(&self) -> Client {
        let mut client = Client::connect(self.addr()).await;
        assert_eq!(client.reply().await, "220 Welcome");
        client
    }

    /// Connects and logs in as the password-less `john`.
    pub async fn login(&self) -> Client {
        let mut client = self.connect().await;
        assert_eq!(client.command("USER john").await, "232 User logged in");
        client
    }

    /// Connects to the implicit TLS listener.
    pub async fn connect_secure(&self) -> Client {
        let tcp = TcpStream::connect(self.secure_addr()).await.unwrap();
        let stream = self.connector.connect(localhost(), tcp).await.unwrap();
        let mut client = Client::over(Box::new(stream));
        assert_eq!(client.reply().await, "220 Welcome");
        client
    }
}

pub trait ClientIo: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> ClientIo for T {}

pub struct Client {
    stream: BufReader<Box<dyn ClientIo>>,
    /// Set once PROT P is in effect; data sockets are then wrapped in TLS.
    protect: Option<TlsConnector>,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self::over(Box::new(stream))
    }

    fn over(stream: Box<dyn ClientIo>) -> Self {
        Self {
            stream: BufReader::new(stream),
            protect: None,
        }
    }

    /// Sends AUTH TLS and runs the client side of the handshake on the same
    /// connection.
    pub async fn auth_tls(mut self, connector: &TlsConnector) -> Self {
        assert_eq!(
            self.command("AUTH TLS").await,
            "234 Using authentication type TLS"
        );
        let plain = self.stream.into_inner();
        let stream = connector.connect(localhost(), plain).await.unwrap();
        Self {
            stream: BufReader::new(Box::new(stream)),
            protect: self.protect,
        }
    }

    /// PBSZ 0 + PROT P; later transfers run over TLS data sockets.
    pub async fn protect_data(&mut self, connector: &TlsConnector) {
        assert_eq!(self.command("PBSZ 0").await, "200 PBSZ=0");
        assert_eq!(self.command("PROT P").await, "200 Protection level is P");
        self.protect = Some(connector.clone());
    }

    pub async fn send(&mut self, line: &str) {
        let stream = self.stream.get_mut();
        stream
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
        stream.flush().await.unwrap();
    }

    /// Reads one reply. Multi-line replies come back joined with `\n`.
    pub async fn reply(&mut self) -> String {
        let first = self.read_line().await.expect("connection closed");
        if first.as_bytes().get(3) != Some(&b'-') {
            return first;
        }
        let terminator = format!("{} ", &first[..3]);
        let mut lines = vec![first];
        loop {
            let line = self.read_line().await.expect("connection closed");
            let done = line.starts_with(&terminator);
            lines.push(line);
            if done {
                return lines.join("\n");
            }
        }
    }

    pub async fn command(&mut self, line: &str) -> String {
        self.send(line).await;
        self.reply().await
    }

    /// True once the server has closed the control connection.
    pub async fn is_closed(&mut self) -> bool {
        self.read_line().await.is_none()
    }

    async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.stream.read_line(&mut line).await {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    /// Enters EPSV and connects the data channel right away.
    pub async fn passive(&mut self) -> TcpStream {
        let reply = self.command("EPSV").await;
        assert!(reply.starts_with("229 "), "{}", reply);
        let port: u16 = reply
            .split("|||")
            .nth(1)
            .and_then(|rest| rest.split('|').next())
            .and_then(|port| port.parse().ok())
            .unwrap_or_else(|| panic!("bad EPSV reply: {}", reply));
        TcpStream::connect(("127.0.0.1", port)).await.unwrap()
    }

    /// Wraps a connected data socket the way the current PROT level asks.
    /// Call after the `150`, once the server is ready for the handshake.
    pub async fn data_stream(&self, tcp: TcpStream) -> Box<dyn ClientIo> {
        match &self.protect {
            Some(connector) => Box::new(connector.connect(localhost(), tcp).await.unwrap()),
            None => Box::new(tcp),
        }
    }

    /// Runs a download-style command (RETR, LIST, MLSD) and returns the
    /// payload with the final reply.
    pub async fn download(&mut self, command: &str) -> (Vec<u8>, String) {
        let tcp = self.passive().await;
        assert_eq!(self.command(command).await, "150 Opening data channel");
        let mut data = self.data_stream(tcp).await;
        let mut payload = Vec::new();
        data.read_to_end(&mut payload).await.unwrap();
        (payload, self.reply().await)
    }

    /// Runs STOR with `payload` and returns the final reply.
    pub async fn upload(&mut self, name: &str, payload: &[u8]) -> String {
        let tcp = self.passive().await;
        assert_eq!(
            self.command(&format!("STOR {}", name)).await,
            "150 Opening data channel"
        );
        let mut data = self.data_stream(tcp).await;
        data.write_all(payload).await.unwrap();
        data.shutdown().await.unwrap();
        drop(data);
        self.reply().await
    }
}
