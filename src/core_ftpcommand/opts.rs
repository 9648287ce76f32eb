use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;

/// Only `OPTS UTF8 ON|OFF` is understood, in any letter case.
pub async fn handle_opts_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    _session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    match arg.to_lowercase().as_str() {
        "utf8 on" => writer.write_reply(200, "UTF8 ON").await?,
        "utf8 off" => writer.write_reply(200, "UTF8 OFF").await?,
        _ => return Err(FtpError::protocol(451, "Not supported")),
    }
    Ok(())
}
