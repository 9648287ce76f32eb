// TLS support: certificate loading, acceptor construction and stream wrapping
// for both the control and the data channels.

pub mod error;
pub mod tls_config;
pub mod tls_connection;

pub use error::TlsError;
pub use tls_config::TlsConfig;
pub use tls_connection::TlsConnection;
