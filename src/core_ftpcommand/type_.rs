use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::{Session, TransferType};

/// Handles the TYPE FTP command.
///
/// Exactly `A` selects ASCII, which converts line endings on RETR and STOR.
/// Every other argument selects binary.
pub async fn handle_type_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if arg == "A" {
        session.transfer_type = TransferType::Ascii;
        writer.write_reply(200, "Type set to ASCII").await?;
    } else {
        session.transfer_type = TransferType::Binary;
        writer.write_reply(200, "Type set to BINARY").await?;
    }
    Ok(())
}
