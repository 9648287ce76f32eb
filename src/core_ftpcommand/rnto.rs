use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_storage::RenameRequest;
use crate::session::Session;
use log::{info, warn};

fn rename_failed() -> FtpError {
    FtpError::path(550, "File rename failed")
}

/// Handles the RNTO FTP command. The RNFR source is consumed either way.
pub async fn handle_rnto_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let Some((from, from_arg)) = session.take_rename_from() else {
        return Err(FtpError::protocol(503, "RNFR required first"));
    };
    let to = resolve_path(session, arg).map_err(|_| FtpError::path(550, "File already exists"))?;

    let request = RenameRequest {
        username: session.username_or_empty().to_string(),
        path: session.cwd.clone(),
        from: from_arg,
        to: arg.to_string(),
    };
    match context.handlers.rename(request).await {
        Some(Ok(true)) => {}
        Some(Ok(false)) => return Err(rename_failed()),
        Some(Err(e)) => {
            warn!("Rename hook failed: {:#}", e);
            return Err(rename_failed());
        }
        None => {
            if context.storage.exists(&to).await {
                return Err(FtpError::path(550, "File already exists"));
            }
            context.storage.rename(&from, &to).await.map_err(|e| {
                warn!("Failed to rename {:?} to {:?}: {}", from, to, e);
                rename_failed()
            })?;
            info!("Renamed {:?} to {:?}", from, to);
        }
    }

    writer.write_reply(250, "File renamed successfully").await?;
    Ok(())
}
