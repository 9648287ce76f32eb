use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::core_transfer::executor::{ensure_data_mode, transfer_failed};
use crate::core_transfer::{execute, TransferOperation};
use crate::session::Session;
use log::warn;

/// Handles the STOR FTP command.
///
/// Overwriting needs `allow_file_overwrite`, creating needs
/// `allow_file_create`. A REST offset > 0 appends instead of truncating.
pub async fn handle_stor_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let offset = session.take_restart_offset();
    let path = resolve_path(session, arg).map_err(|_| transfer_failed(arg))?;

    if context.handlers.has_upload() {
        if !session.permissions.allow_file_create {
            return Err(transfer_failed(arg));
        }
        return execute(
            writer,
            context,
            session,
            TransferOperation::Store {
                path,
                offset,
                destination: None,
            },
            arg,
        )
        .await;
    }

    if context.storage.exists(&path).await {
        if !session.permissions.allow_file_overwrite {
            return Err(FtpError::path(550, "File already exists"));
        }
    } else if !session.permissions.allow_file_create {
        return Err(transfer_failed(arg));
    }

    // The destination is only opened once a data connection can follow.
    ensure_data_mode(session)?;
    let destination = context.storage.put(&path, offset > 0).await.map_err(|e| {
        warn!("Failed to open {:?} for writing: {}", path, e);
        transfer_failed(arg)
    })?;

    execute(
        writer,
        context,
        session,
        TransferOperation::Store {
            path,
            offset,
            destination: Some(destination),
        },
        arg,
    )
    .await
}
