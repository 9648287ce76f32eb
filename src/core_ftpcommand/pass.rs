use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;
use log::warn;

/// Handles the PASS FTP command. A wrong password ends the connection.
pub async fn handle_pass_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    password: &str,
) -> Result<(), FtpError> {
    let username = session.username_or_empty().to_string();
    match context.auth.authenticate(&username, Some(password)).await {
        Some(grant) => {
            session.apply_grant(grant);
            writer.write_reply(230, "Logged on").await?;
            Ok(())
        }
        None => {
            warn!("Login failed for user: {}", username);
            Err(FtpError::Auth("Username or password incorrect".to_string()))
        }
    }
}
