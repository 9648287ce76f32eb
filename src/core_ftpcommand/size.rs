use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

pub async fn handle_size_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let path = resolve_path(session, arg)?;
    match context.storage.metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {
            writer.write_reply(213, &metadata.len.to_string()).await?;
            Ok(())
        }
        _ => Err(FtpError::path(550, "File not found")),
    }
}
