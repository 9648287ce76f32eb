use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_storage::path::change_directory_target;
use crate::session::Session;
use log::{info, warn};

fn cwd_failed() -> FtpError {
    FtpError::path(530, "CWD not successful")
}

/// Handles the CWD FTP command.
///
/// # Arguments
///
/// * `writer` - The control connection replies go to.
/// * `context` - Shared server state; only the storage backend is used.
/// * `session` - The session whose working directory changes.
/// * `arg` - Absolute or relative target; `..` goes up one level.
///
/// Every failure (missing, not a directory, outside the root) gets the same
/// `530` reply.
pub async fn handle_cwd_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let (absolute, virtual_dir) =
        change_directory_target(&session.root, &session.cwd, arg).map_err(|e| {
            warn!("CWD rejected: {}", e);
            cwd_failed()
        })?;

    if !context.storage.is_dir(&absolute).await {
        warn!("CWD target is not a directory: {:?}", absolute);
        return Err(cwd_failed());
    }

    info!("Changed directory to {}", virtual_dir);
    session.cwd = virtual_dir;
    writer
        .write_reply(
            250,
            &format!("CWD successful. \"{}\" is current directory", session.cwd),
        )
        .await?;
    Ok(())
}
