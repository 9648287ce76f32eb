use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;
use std::io;

/// Handles AUTH TLS / AUTH SSL: replies `234` in the clear, then upgrades the
/// control connection in place. Login state is kept.
pub async fn handle_auth_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if arg != "TLS" && arg != "SSL" {
        return Err(FtpError::protocol(504, format!("Unsupported auth type {}", arg)));
    }
    if writer.is_secure() {
        return Err(FtpError::protocol(503, "Already using TLS"));
    }

    writer
        .write_reply(234, &format!("Using authentication type {}", arg))
        .await?;
    // The plain stream is gone once the handshake starts, so a failure here
    // cannot be answered.
    writer.upgrade(&context.tls).await.map_err(|e| {
        FtpError::Connection(io::Error::new(io::ErrorKind::ConnectionAborted, e))
    })?;
    session.secure = writer.is_secure();
    Ok(())
}
