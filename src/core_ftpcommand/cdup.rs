use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

/// Same as `CWD ..`.
pub async fn handle_cdup_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    handle_cwd_command(writer, context, session, "..").await
}
