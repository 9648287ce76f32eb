use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;
use log::info;

/// Handles the DELE FTP command. The file must exist before the delete
/// permission is even looked at.
pub async fn handle_dele_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let path = resolve_path(session, arg)?;
    if !context.storage.is_file(&path).await {
        return Err(FtpError::path(550, "File not found"));
    }
    if !session.permissions.allow_file_delete {
        return Err(FtpError::PermissionDenied);
    }

    context.storage.del(&path).await?;
    info!("Deleted file {:?}", path);
    writer.write_reply(250, "File deleted successfully").await?;
    Ok(())
}
