use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

/// Handles the RNFR FTP command. A rename hook is trusted to know about
/// files the local storage does not have.
pub async fn handle_rnfr_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let path =
        resolve_path(session, arg).map_err(|_| FtpError::path(550, "File does not exist"))?;

    if !context.handlers.has_rename() && !context.storage.is_file(&path).await {
        return Err(FtpError::path(550, "File does not exist"));
    }

    session.rename_from = Some((path, arg.to_string()));
    writer.write_reply(350, "File exists").await?;
    Ok(())
}
