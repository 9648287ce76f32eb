use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;
use log::debug;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpListener;

/// Binds the first free port in `min_port ..= min_port + max_connections` on
/// the unspecified address of `family`. `None` when the range is disabled
/// or every port is taken.
pub async fn bind_passive_listener(
    min_port: u16,
    max_connections: usize,
    family: IpAddr,
) -> Option<TcpListener> {
    if min_port == 0 || min_port == u16::MAX {
        return None;
    }

    let unspecified = match family {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    let last_port = (min_port as usize)
        .saturating_add(max_connections)
        .min(u16::MAX as usize) as u16;

    for port in min_port..=last_port {
        match TcpListener::bind(SocketAddr::new(unspecified, port)).await {
            Ok(listener) => return Some(listener),
            Err(e) => debug!("Data port {} unavailable: {}", port, e),
        }
    }
    None
}

/// The IPv4 address a PASV reply advertises: the configured one, otherwise
/// the control connection's local address.
pub fn advertised_address(pasv_address: Option<&str>, local: IpAddr) -> Option<Ipv4Addr> {
    if let Some(configured) = pasv_address {
        return configured.trim().parse().ok();
    }
    match local {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}

pub fn format_pasv_reply(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "Entering passive mode ({},{},{},{},{},{})",
        h1,
        h2,
        h3,
        h4,
        port / 256,
        port % 256
    )
}

pub fn format_epsv_reply(port: u16) -> String {
    format!("Entering extended passive mode (|||{}|)", port)
}

async fn open_listener(context: &ServerContext, session: &mut Session) -> Option<TcpListener> {
    // Drop the previous listener first so its port can be reused.
    session.data_channel.reset();
    let listener = bind_passive_listener(
        context.config.server.min_data_port,
        context.config.server.max_connections,
        session.local_addr.ip(),
    )
    .await?;
    if let Ok(addr) = listener.local_addr() {
        context.events.debug(&format!(
            "{} listening on {} for data connection",
            session.connection_info(),
            addr.port()
        ));
    }
    Some(listener)
}

pub async fn handle_pasv_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    let advertised = advertised_address(
        context.config.server.pasv_address.as_deref(),
        session.local_addr.ip(),
    );
    let listener = match advertised {
        Some(_) => open_listener(context, session).await,
        None => {
            session.data_channel.reset();
            None
        }
    };

    match (advertised, listener) {
        (Some(ip), Some(listener)) => {
            let port = listener.local_addr()?.port();
            session.data_channel.set_passive(listener);
            writer.write_reply(227, &format_pasv_reply(ip, port)).await?;
            Ok(())
        }
        _ => Err(FtpError::protocol(501, "Passive mode failed")),
    }
}

pub async fn handle_epsv_command(
    writer: &mut ControlChannel,
    context: &ServerContext,
    session: &mut Session,
    _arg: &str,
) -> Result<(), FtpError> {
    match open_listener(context, session).await {
        Some(listener) => {
            let port = listener.local_addr()?.port();
            session.data_channel.set_passive(listener);
            writer.write_reply(229, &format_epsv_reply(port)).await?;
            Ok(())
        }
        None => Err(FtpError::protocol(501, "Passive mode failed")),
    }
}
