// TLS configuration
use crate::core_tls::error::TlsError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Also listen on the secure port with implicit TLS.
    pub enabled: bool,

    /// PEM certificate chain. A self-signed certificate is generated when unset.
    pub cert_file: Option<PathBuf>,

    /// PEM private key (PKCS#8 or RSA).
    pub key_file: Option<PathBuf>,
}

impl TlsConfig {
    /// Checks that configured certificate material exists on disk.
    pub fn validate(&self) -> Result<(), TlsError> {
        match (&self.cert_file, &self.key_file) {
            (Some(cert_file), Some(key_file)) => {
                if !cert_file.exists() {
                    return Err(TlsError::CertificateLoadError(format!(
                        "Certificate file not found: {:?}",
                        cert_file
                    )));
                }
                if !key_file.exists() {
                    return Err(TlsError::PrivateKeyLoadError(format!(
                        "Private key file not found: {:?}",
                        key_file
                    )));
                }
                Ok(())
            }
            (None, None) => Ok(()),
            _ => Err(TlsError::TlsConfigError(
                "cert_file and key_file must be configured together".to_string(),
            )),
        }
    }
}
