use crate::constants::MACHINE_TIME_FORMAT;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_transfer::listing::machine_time;
use crate::session::Session;
use chrono::{NaiveDateTime, TimeZone, Utc};
use std::time::SystemTime;

fn syntax_error() -> FtpError {
    FtpError::protocol(501, "Syntax error in parameters or arguments")
}

fn file_missing() -> FtpError {
    FtpError::path(550, "File does not exist")
}

fn looks_like_timestamp(token: &str) -> bool {
    token.len() == 14 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an MFMT timestamp (`YYYYMMDDHHMMSS`, UTC).
pub fn parse_timestamp(value: &str) -> Option<SystemTime> {
    let naive = NaiveDateTime::parse_from_str(value, MACHINE_TIME_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive).into())
}

/// Handles MFMT and MDTM.
///
/// `<timestamp> <path>` sets the modification time, a lone `<path>` queries
/// it. Both verbs accept both forms.
pub async fn handle_mdtm_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if arg.is_empty() {
        return Err(syntax_error());
    }

    let Some((timestamp, target)) = arg
        .split_once(' ')
        .filter(|(first, _)| looks_like_timestamp(first))
    else {
        let path = resolve_path(session, arg)?;
        return match context.storage.metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                writer
                    .write_reply(213, &machine_time(metadata.modified))
                    .await?;
                Ok(())
            }
            _ => Err(file_missing()),
        };
    };

    let modified = parse_timestamp(timestamp).ok_or_else(syntax_error)?;
    let path = resolve_path(session, target.trim()).map_err(|_| file_missing())?;
    if !context.storage.is_file(&path).await {
        return Err(file_missing());
    }
    context.storage.set_modified(&path, modified).await?;
    writer.write_reply(253, "Date/time changed okay").await?;
    Ok(())
}
