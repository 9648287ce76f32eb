use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;
use log::info;

/// Handles the MKD FTP command. Missing parent folders are created too.
pub async fn handle_mkd_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if !session.permissions.allow_folder_create {
        return Err(FtpError::PermissionDenied);
    }
    let path = resolve_path(session, arg).map_err(|_| FtpError::PermissionDenied)?;

    if context.storage.is_dir(&path).await {
        return Err(FtpError::path(550, "Folder exists"));
    }
    context.storage.mkd(&path).await?;
    info!("Created folder {:?}", path);
    writer.write_reply(250, "Folder created successfully").await?;
    Ok(())
}
