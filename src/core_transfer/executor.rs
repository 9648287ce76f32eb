use crate::constants::TRANSFER_BUFFER_SIZE;
use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::data_channel::DataStream;
use crate::core_network::network::ServerContext;
use crate::core_storage::path::file_name;
use crate::core_storage::{BoxAsyncRead, BoxAsyncWrite, DownloadRequest, ListFormat, ListRequest, UploadRequest};
use crate::core_transfer::ascii::{AsciiDecoder, AsciiEncoder};
use crate::core_transfer::listing;
use crate::session::Session;
use log::{debug, warn};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

/// Work to run once the data connection is up. Paths have already been
/// resolved and checked against the session's permissions.
pub enum TransferOperation {
    List {
        format: ListFormat,
        directory: PathBuf,
    },
    Retrieve {
        path: PathBuf,
        offset: u64,
    },
    /// `destination` is `None` when an upload hook takes the data.
    Store {
        path: PathBuf,
        offset: u64,
        destination: Option<BoxAsyncWrite>,
    },
}

/// Fails with `501 Command failed` when no PASV/EPSV/PORT/EPRT is in effect.
pub fn ensure_data_mode(session: &Session) -> Result<(), FtpError> {
    if session.data_channel.is_armed() {
        Ok(())
    } else {
        Err(FtpError::protocol(501, "Command failed"))
    }
}

/// The `550` every refused or failed transfer of `label` ends with.
pub fn transfer_failed(label: &str) -> FtpError {
    FtpError::transfer(550, format!("Transfer failed \"{}\"", label))
}

fn transfer_aborted(label: &str) -> FtpError {
    FtpError::transfer(426, format!("Connection closed. Aborted transfer of \"{}\"", label))
}

/// Sends `150`, opens the data connection, runs `operation` and sends the
/// final `226`. Failures come back as the `425`/`426`/`550` to send.
/// `label` is the name quoted in the final reply.
pub async fn execute(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    operation: TransferOperation,
    label: &str,
) -> Result<(), FtpError> {
    ensure_data_mode(session)?;
    writer.write_reply(150, "Opening data channel").await?;

    let tls = if session.protect_data() {
        Some(&context.tls)
    } else {
        None
    };
    let wait = Duration::from_secs(context.config.server.data_connection_timeout);
    // The control socket is watched while waiting so a client that hangs up
    // ends the session instead of pinning it. A command sent meanwhile stays
    // buffered for the main loop.
    let opened = tokio::select! {
        opened = timeout(wait, session.data_channel.open(tls)) => opened,
        false = writer.wait_for_input() => {
            return Err(FtpError::Connection(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "client left while the data connection was pending",
            )));
        }
    };
    let mut stream = match opened {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            context.events.debug(&format!(
                "{} data connection failed: {}",
                session.connection_info(),
                e
            ));
            return Err(FtpError::transfer(425, "Can't open data connection"));
        }
        Err(_) => {
            context.events.debug(&format!(
                "{} data connection timed out after {}s",
                session.connection_info(),
                wait.as_secs()
            ));
            return Err(FtpError::transfer(425, "Can't open data connection"));
        }
    };
    context.events.debug(&format!(
        "{} data connection established",
        session.connection_info()
    ));

    let result = match operation {
        TransferOperation::List { format, directory } => {
            send_listing(context, session, &mut stream, format, directory, label).await
        }
        TransferOperation::Retrieve { path, offset } => {
            retrieve(context, session, &mut stream, path, offset, label).await
        }
        TransferOperation::Store {
            path,
            offset,
            destination,
        } => store(context, session, &mut stream, path, offset, destination, label).await,
    };
    drop(stream);

    result?;
    writer
        .write_reply(226, &format!("Successfully transferred \"{}\"", label))
        .await?;
    Ok(())
}

async fn send_listing(
    context: &ServerContext,
    session: &Session,
    stream: &mut DataStream,
    format: ListFormat,
    directory: PathBuf,
    label: &str,
) -> Result<(), FtpError> {
    let request = ListRequest {
        username: session.username_or_empty().to_string(),
        path: session.cwd.clone(),
        format,
    };
    let data = match context.handlers.list(request).await {
        Some(Ok(data)) if data.is_empty() => b"\r\n".to_vec(),
        Some(Ok(data)) => data,
        Some(Err(e)) => {
            warn!("List hook failed: {:#}", e);
            return Err(transfer_failed(label));
        }
        None => match context.storage.list(&directory).await {
            Ok(entries) => listing::render(&entries, format, session.username_or_empty()),
            Err(e) => {
                warn!("Failed to list {:?}: {}", directory, e);
                return Err(transfer_failed(label));
            }
        },
    };

    context.events.debug(&format!(
        "{} LIST response on data channel\r\n{}",
        session.connection_info(),
        String::from_utf8_lossy(&data)
    ));
    // The client may hang up as soon as it has what it wants.
    if let Err(e) = stream.write_all(&data).await {
        debug!("Listing data connection closed early: {}", e);
    }
    let _ = stream.shutdown().await;
    Ok(())
}

async fn retrieve(
    context: &ServerContext,
    session: &Session,
    stream: &mut DataStream,
    path: PathBuf,
    offset: u64,
    label: &str,
) -> Result<(), FtpError> {
    let request = DownloadRequest {
        username: session.username_or_empty().to_string(),
        path: session.cwd.clone(),
        file_name: file_name(&path),
        offset,
    };
    match context.handlers.download(request).await {
        Some(Ok(data)) => {
            stream
                .write_all(&data)
                .await
                .map_err(|_| transfer_aborted(label))?;
            stream.shutdown().await.map_err(|_| transfer_aborted(label))?;
            Ok(())
        }
        Some(Err(e)) => {
            warn!("Download hook failed: {:#}", e);
            Err(transfer_failed(label))
        }
        None => {
            let reader = context.storage.get(&path, offset).await.map_err(|e| {
                warn!("Failed to open {:?}: {}", path, e);
                transfer_failed(label)
            })?;
            copy_to_client(reader, stream, session.is_ascii(), label).await
        }
    }
}

async fn copy_to_client(
    mut reader: BoxAsyncRead,
    stream: &mut DataStream,
    ascii: bool,
    label: &str,
) -> Result<(), FtpError> {
    let mut buffer = vec![0u8; TRANSFER_BUFFER_SIZE];
    let mut encoded = Vec::new();
    let mut encoder = AsciiEncoder::new();
    loop {
        let n = reader
            .read(&mut buffer)
            .await
            .map_err(|_| transfer_failed(label))?;
        if n == 0 {
            break;
        }
        let chunk = if ascii {
            encoded.clear();
            encoder.encode(&buffer[..n], &mut encoded);
            &encoded[..]
        } else {
            &buffer[..n]
        };
        stream
            .write_all(chunk)
            .await
            .map_err(|_| transfer_aborted(label))?;
    }
    stream.shutdown().await.map_err(|_| transfer_aborted(label))?;
    Ok(())
}

async fn store(
    context: &ServerContext,
    session: &Session,
    stream: &mut DataStream,
    path: PathBuf,
    offset: u64,
    destination: Option<BoxAsyncWrite>,
    label: &str,
) -> Result<(), FtpError> {
    match destination {
        Some(destination) => copy_from_client(stream, destination, session.is_ascii(), label).await,
        None => {
            let mut data = Vec::new();
            stream
                .read_to_end(&mut data)
                .await
                .map_err(|_| transfer_aborted(label))?;
            let data = if session.is_ascii() {
                let mut decoder = AsciiDecoder::new();
                let mut decoded = Vec::with_capacity(data.len());
                decoder.decode(&data, &mut decoded);
                decoder.finish(&mut decoded);
                decoded
            } else {
                data
            };

            let request = UploadRequest {
                username: session.username_or_empty().to_string(),
                path: session.cwd.clone(),
                file_name: file_name(&path),
                data,
                offset,
            };
            match context.handlers.upload(request).await {
                Some(Ok(true)) => Ok(()),
                Some(Ok(false)) => Err(transfer_failed(label)),
                Some(Err(e)) => {
                    warn!("Upload hook failed: {:#}", e);
                    Err(transfer_failed(label))
                }
                None => {
                    warn!("Store without destination or upload hook: {:?}", path);
                    Err(transfer_failed(label))
                }
            }
        }
    }
}

async fn copy_from_client(
    stream: &mut DataStream,
    mut destination: BoxAsyncWrite,
    ascii: bool,
    label: &str,
) -> Result<(), FtpError> {
    let mut buffer = vec![0u8; TRANSFER_BUFFER_SIZE];
    let mut decoded = Vec::new();
    let mut decoder = AsciiDecoder::new();
    loop {
        let n = stream
            .read(&mut buffer)
            .await
            .map_err(|_| transfer_aborted(label))?;
        if n == 0 {
            break;
        }
        let chunk = if ascii {
            decoded.clear();
            decoder.decode(&buffer[..n], &mut decoded);
            &decoded[..]
        } else {
            &buffer[..n]
        };
        destination
            .write_all(chunk)
            .await
            .map_err(|_| transfer_failed(label))?;
    }
    if ascii {
        decoded.clear();
        decoder.finish(&mut decoded);
        destination
            .write_all(&decoded)
            .await
            .map_err(|_| transfer_failed(label))?;
    }
    destination
        .shutdown()
        .await
        .map_err(|_| transfer_failed(label))?;
    Ok(())
}
