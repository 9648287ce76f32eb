use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

/// Any buffer size is accepted and echoed back; it only unlocks PROT.
pub async fn handle_pbsz_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    session.pbsz_completed = true;
    writer.write_reply(200, &format!("PBSZ={}", arg)).await?;
    Ok(())
}
