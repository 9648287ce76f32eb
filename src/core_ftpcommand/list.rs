use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_storage::ListFormat;
use crate::core_transfer::{execute, TransferOperation};
use crate::session::Session;

/// Handles the LIST FTP command. Always lists the current directory; the
/// argument (`-a` and friends) is ignored.
pub async fn handle_list_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    send_listing(writer, context, session, ListFormat::List).await
}

/// Handles the MLSD FTP command.
pub async fn handle_mlsd_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    send_listing(writer, context, session, ListFormat::Mlsd).await
}

async fn send_listing(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    format: ListFormat,
) -> Result<(), FtpError> {
    let directory = resolve_path(session, "")?;
    let label = session.cwd.clone();
    execute(
        writer,
        context,
        session,
        TransferOperation::List { format, directory },
        &label,
    )
    .await
}
