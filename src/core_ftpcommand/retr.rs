use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_transfer::executor::transfer_failed;
use crate::core_transfer::{execute, TransferOperation};
use crate::session::Session;
use log::warn;

/// Handles the RETR FTP command.
///
/// A pending REST offset is consumed whatever the outcome. With a download
/// hook installed the file need not exist locally; the hook decides.
pub async fn handle_retr_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let offset = session.take_restart_offset();
    let path = resolve_path(session, arg)?;

    if !context.handlers.has_download() {
        let is_file = context.storage.is_file(&path).await;
        if !is_file {
            return Err(FtpError::path(550, "File not found"));
        }
    }
    if !session.permissions.allow_file_retrieve {
        warn!("{} retrieve of {:?} denied", session.connection_info(), path);
        return Err(transfer_failed(arg));
    }

    execute(
        writer,
        context,
        session,
        TransferOperation::Retrieve { path, offset },
        arg,
    )
    .await
}
