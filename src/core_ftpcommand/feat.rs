use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::feature_lines;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

pub async fn handle_feat_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    _session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    writer
        .write_multiline(211, "Features:", &feature_lines(), "End")
        .await?;
    Ok(())
}
