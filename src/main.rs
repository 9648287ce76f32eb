use anyhow::{Context, Result};
use colored::*;
use env_logger::{Builder, Env};
use log::{info, warn};
use rouilleftpd_engine::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use rouilleftpd_engine::{Config, Server};
use std::io::Write;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with a custom format and colors
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = buf.timestamp().to_string();
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();

    let config = load_config()?;
    let mut server = Server::new(config).context("Failed to configure the FTP server")?;
    server.start().await.context("Failed to start the FTP server")?;
    if let Some(addr) = server.local_addr() {
        info!("Serving FTP on {}", addr);
    }
    if let Some(addr) = server.secure_addr() {
        info!("Serving implicit FTPS on {}", addr);
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");
    server.stop().await;
    server
        .cleanup()
        .await
        .context("Failed to remove the base folder")?;
    Ok(())
}

/// An explicit path (from the environment) must load; the default path
/// falls back to built-in defaults when absent.
fn load_config() -> Result<Config> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Config::load_from_file(&path);
    }
    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        Config::load_from_file(&path)
    } else {
        warn!(
            "No configuration at {}, using defaults",
            path.display()
        );
        Ok(Config::default())
    }
}
