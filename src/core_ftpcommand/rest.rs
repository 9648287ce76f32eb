use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

/// Handles the REST FTP command. The offset applies to the next RETR or
/// STOR only.
pub async fn handle_rest_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    match arg.parse::<u64>() {
        Ok(offset) => {
            session.restart_offset = offset;
            writer
                .write_reply(350, &format!("Restarting at {}", offset))
                .await?;
            Ok(())
        }
        Err(_) => {
            session.restart_offset = 0;
            Err(FtpError::path(550, "Wrong restart offset"))
        }
    }
}
