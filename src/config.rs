use crate::constants::{
    DEFAULT_BASE_FOLDER_NAME, DEFAULT_DATA_CONNECTION_TIMEOUT, DEFAULT_MAX_CONNECTIONS,
    DEFAULT_MIN_DATA_PORT, DEFAULT_PORT, DEFAULT_SECURE_PORT,
};
use crate::core_tls::TlsConfig;
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The six independent permission flags a login is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub allow_file_create: bool,
    pub allow_file_retrieve: bool,
    pub allow_file_overwrite: bool,
    pub allow_file_delete: bool,
    pub allow_folder_delete: bool,
    pub allow_folder_create: bool,
}

impl Permissions {
    pub fn allow_all() -> Self {
        Self {
            allow_file_create: true,
            allow_file_retrieve: true,
            allow_file_overwrite: true,
            allow_file_delete: true,
            allow_folder_delete: true,
            allow_folder_create: true,
        }
    }

    pub fn deny_all() -> Self {
        Self {
            allow_file_create: false,
            allow_file_retrieve: false,
            allow_file_overwrite: false,
            allow_file_delete: false,
            allow_folder_delete: false,
            allow_folder_create: false,
        }
    }
}

/// Authenticated users get everything unless their entry says otherwise.
impl Default for Permissions {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub secure_port: u16,
    pub max_connections: usize,
    /// Root of every login that has no folder of its own. `None` selects the
    /// server-managed default folder.
    pub basefolder: Option<PathBuf>,
    pub min_data_port: u16,
    /// Seconds a transfer waits for its data connection before `425`.
    pub data_connection_timeout: u64,
    /// IPv4 address advertised in PASV replies instead of the control socket's.
    pub pasv_address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub allow_login_without_password: bool,
    #[serde(flatten)]
    pub permissions: Permissions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            secure_port: DEFAULT_SECURE_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            basefolder: None,
            min_data_port: DEFAULT_MIN_DATA_PORT,
            data_connection_timeout: DEFAULT_DATA_CONNECTION_TIMEOUT,
            pasv_address: None,
            username: None,
            password: None,
            allow_login_without_password: false,
            permissions: Permissions::allow_all(),
        }
    }
}

/// Anonymous access. Every flag is off unless switched on explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymousConfig {
    pub allow_login: bool,
    pub allow_file_create: bool,
    pub allow_file_retrieve: bool,
    pub allow_file_overwrite: bool,
    pub allow_file_delete: bool,
    pub allow_folder_delete: bool,
    pub allow_folder_create: bool,
}

impl AnonymousConfig {
    pub fn permissions(&self) -> Permissions {
        Permissions {
            allow_file_create: self.allow_file_create,
            allow_file_retrieve: self.allow_file_retrieve,
            allow_file_overwrite: self.allow_file_overwrite,
            allow_file_delete: self.allow_file_delete,
            allow_folder_delete: self.allow_folder_delete,
            allow_folder_create: self.allow_folder_create,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub username: String,
    pub password: Option<String>,
    pub allow_login_without_password: bool,
    pub basefolder: Option<PathBuf>,
    #[serde(flatten)]
    pub permissions: Permissions,
}

impl UserConfig {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: Some(password.to_string()),
            ..Self::default()
        }
    }

    pub fn without_password(username: &str) -> Self {
        Self {
            username: username.to_string(),
            allow_login_without_password: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub anonymous: AnonymousConfig,
    pub users: Vec<UserConfig>,
    pub tls: TlsConfig,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        Ok(config)
    }

    /// The folder the server creates and owns when the host gives none.
    pub fn default_basefolder() -> PathBuf {
        std::env::temp_dir().join(DEFAULT_BASE_FOLDER_NAME)
    }

    pub fn uses_default_basefolder(&self) -> bool {
        self.server.basefolder.is_none()
    }

    pub fn basefolder(&self) -> PathBuf {
        self.server
            .basefolder
            .clone()
            .unwrap_or_else(Self::default_basefolder)
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Port: {}", config.server.port);
    info!("  Secure Port: {}", config.server.secure_port);
    info!("  Implicit TLS: {}", config.tls.enabled);
    info!("  Max Connections: {}", config.server.max_connections);
    info!("  Base Folder: {}", config.basefolder().display());
    info!("  Min Data Port: {}", config.server.min_data_port);
    info!("  Data Timeout: {}s", config.server.data_connection_timeout);
    info!("  Anonymous Login: {}", config.anonymous.allow_login);
    info!("  Configured Users: {}", config.users.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 21);
        assert_eq!(config.server.secure_port, 990);
        assert_eq!(config.server.max_connections, 10);
        assert_eq!(config.server.min_data_port, 1024);
        assert_eq!(config.server.data_connection_timeout, 30);
        assert!(!config.anonymous.allow_login);
        assert_eq!(config.anonymous.permissions(), Permissions::deny_all());
        assert_eq!(config.server.permissions, Permissions::allow_all());
        assert!(config.uses_default_basefolder());
        assert!(!config.tls.enabled);
    }

    #[test]
    fn user_entries_default_to_allow() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 2121
            basefolder = "/srv/ftp"

            [anonymous]
            allow_login = true
            allow_file_retrieve = true

            [[users]]
            username = "john"
            allow_login_without_password = true
            allow_file_delete = false

            [[users]]
            username = "jane"
            password = "secret"
            basefolder = "/srv/ftp/jane"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 2121);
        assert_eq!(config.basefolder(), PathBuf::from("/srv/ftp"));
        assert!(config.anonymous.permissions().allow_file_retrieve);
        assert!(!config.anonymous.permissions().allow_file_create);

        let john = &config.users[0];
        assert!(john.allow_login_without_password);
        assert!(!john.permissions.allow_file_delete);
        assert!(john.permissions.allow_file_create);
        assert!(john.password.is_none());

        let jane = &config.users[1];
        assert_eq!(jane.password.as_deref(), Some("secret"));
        assert_eq!(jane.basefolder, Some(PathBuf::from("/srv/ftp/jane")));
        assert_eq!(jane.permissions, Permissions::allow_all());
    }
}
