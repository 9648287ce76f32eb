use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_storage::path::normalize;
use crate::session::Session;
use log::info;

/// Handles RMD and RMDA. The folder is removed with everything in it.
/// A path outside the root, or the root itself, counts as not permitted.
pub async fn handle_rmd_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if !session.permissions.allow_folder_delete {
        return Err(FtpError::PermissionDenied);
    }
    let path = resolve_path(session, arg).map_err(|_| FtpError::PermissionDenied)?;
    if path == normalize(&session.root) {
        return Err(FtpError::PermissionDenied);
    }

    if !context.storage.is_dir(&path).await {
        return Err(FtpError::path(550, "Folder not found"));
    }
    context.storage.rmd(&path).await?;
    info!("Removed folder {:?}", path);
    writer.write_reply(250, "Folder deleted successfully").await?;
    Ok(())
}
