// src/constants.rs

pub const DEFAULT_PORT: u16 = 21;
pub const DEFAULT_SECURE_PORT: u16 = 990;
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;
pub const DEFAULT_MIN_DATA_PORT: u16 = 1024;
pub const DEFAULT_DATA_CONNECTION_TIMEOUT: u64 = 30;

/// Name of the server-managed base folder created under the system temp dir
/// when the host does not supply one.
pub const DEFAULT_BASE_FOLDER_NAME: &str = "rouilleftpd";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/rouilleftpd.toml";
pub const CONFIG_ENV_VAR: &str = "ROUILLEFTPD_CONFIG";

pub const ANONYMOUS_USER: &str = "anonymous";

pub const TRANSFER_BUFFER_SIZE: usize = 64 * 1024;
pub const MAX_COMMAND_LENGTH: usize = 4096;

/// Broadcast capacity of the host event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Timestamp layout used for MLSD facts and MFMT/MDTM arguments.
pub const MACHINE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";
pub const LIST_TIME_FORMAT: &str = "%b %d %H:%M";
pub const EVENT_TIME_FORMAT: &str = "%d.%m.%Y - %H:%M:%S";
