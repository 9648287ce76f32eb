use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

pub async fn handle_pwd_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    writer
        .write_reply(257, &format!("\"{}\" is current directory", session.cwd))
        .await?;
    Ok(())
}
