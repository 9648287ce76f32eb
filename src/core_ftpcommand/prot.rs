use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

/// Handles the PROT FTP command. Requires a prior PBSZ; `P` turns on TLS for
/// data connections (effective only on a secure control connection), `C`
/// turns it off.
pub async fn handle_prot_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if !session.pbsz_completed {
        return Err(FtpError::protocol(503, "PBSZ missing"));
    }
    match arg {
        "C" | "P" => {
            session.protection = arg == "P";
            writer
                .write_reply(200, &format!("Protection level is {}", arg))
                .await?;
            Ok(())
        }
        _ => Err(FtpError::protocol(534, "Protection level must be C or P")),
    }
}
