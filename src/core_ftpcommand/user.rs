use crate::core_auth::LoginType;
use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::{AuthState, Session};
use log::info;

/// Handles the USER FTP command.
///
/// Unknown users get `530` but may try again. Users allowed in without a
/// password are logged in right here with `232`.
pub async fn handle_user_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    username: &str,
) -> Result<(), FtpError> {
    info!("Received USER command with username: {}", username);
    session.username = Some(username.to_string());

    match context.auth.evaluate_user(username) {
        LoginType::None => {
            session.auth_state = AuthState::Unauthenticated;
            writer.write_reply(530, "Not logged in").await?;
        }
        LoginType::Anonymous | LoginType::Password => {
            session.auth_state = AuthState::PasswordPending;
            writer
                .write_reply(331, &format!("Password required for {}", username))
                .await?;
        }
        LoginType::NoPassword => match context.auth.authenticate(username, None).await {
            Some(grant) => {
                session.apply_grant(grant);
                writer.write_reply(232, "User logged in").await?;
            }
            None => return Err(FtpError::Auth("Username or password incorrect".to_string())),
        },
    }
    Ok(())
}
