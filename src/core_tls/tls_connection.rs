// TLS connection handling
use crate::core_tls::error::TlsError;
use crate::core_tls::tls_config::TlsConfig;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::server::TlsStream;
use tokio_rustls::{rustls, TlsAcceptor};

/// Holds the server-side TLS acceptor shared by every session.
///
/// The same acceptor upgrades control connections (AUTH TLS), accepts
/// implicit-TLS control connections and wraps protected data connections.
#[derive(Clone)]
pub struct TlsConnection {
    tls_acceptor: TlsAcceptor,
}

impl std::fmt::Debug for TlsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConnection").finish_non_exhaustive()
    }
}

impl TlsConnection {
    pub fn new(config: &TlsConfig) -> Result<Self, TlsError> {
        config.validate()?;

        let (cert_chain, private_key) = match (&config.cert_file, &config.key_file) {
            (Some(cert_file), Some(key_file)) => {
                info!("Loading TLS certificate from {:?}", cert_file);
                (load_certificates(cert_file)?, load_private_key(key_file)?)
            }
            _ => {
                info!("No TLS certificate configured, generating a self-signed one");
                generate_self_signed()?
            }
        };

        let server_config = rustls::ServerConfig::builder()
            .with_safe_defaults()
            .with_no_client_auth()
            .with_single_cert(cert_chain, private_key)
            .map_err(|e| TlsError::TlsConfigError(e.to_string()))?;

        Ok(Self {
            tls_acceptor: TlsAcceptor::from(Arc::new(server_config)),
        })
    }

    /// Runs the server side of a TLS handshake over an accepted or connected socket.
    pub async fn accept_tls(&self, stream: TcpStream) -> Result<TlsStream<TcpStream>, TlsError> {
        match self.tls_acceptor.accept(stream).await {
            Ok(tls_stream) => {
                debug!("TLS handshake completed");
                Ok(tls_stream)
            }
            Err(e) => Err(TlsError::TlsHandshakeError(e.to_string())),
        }
    }
}

fn load_certificates(path: &Path) -> Result<Vec<rustls::Certificate>, TlsError> {
    let certs = std::fs::read(path).map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;
    let cert_chain = rustls_pemfile::certs(&mut &certs[..])
        .map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;
    if cert_chain.is_empty() {
        return Err(TlsError::CertificateLoadError(format!(
            "No certificate found in {:?}",
            path
        )));
    }
    Ok(cert_chain.into_iter().map(rustls::Certificate).collect())
}

fn load_private_key(path: &Path) -> Result<rustls::PrivateKey, TlsError> {
    let key = std::fs::read(path).map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?;

    let mut keys = rustls_pemfile::pkcs8_private_keys(&mut &key[..])
        .map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?;
    if keys.is_empty() {
        keys = rustls_pemfile::rsa_private_keys(&mut &key[..])
            .map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?;
    }

    match keys.pop() {
        Some(k) => Ok(rustls::PrivateKey(k)),
        None => Err(TlsError::PrivateKeyLoadError(
            "No private key found".to_string(),
        )),
    }
}

fn generate_self_signed() -> Result<(Vec<rustls::Certificate>, rustls::PrivateKey), TlsError> {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .map_err(|e| TlsError::CertificateGenerationError(e.to_string()))?;
    let cert = rustls::Certificate(certified.cert.der().to_vec());
    let key = rustls::PrivateKey(certified.key_pair.serialize_der());
    Ok((vec![cert], key))
}
