use crate::core_ftpcommand::error::FtpError;
use crate::core_network::control::ControlChannel;
use crate::core_network::network::ServerContext;
use crate::session::Session;
use log::info;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Parses `h1,h2,h3,h4,p1,p2`.
pub fn parse_port_argument(arg: &str) -> Option<SocketAddr> {
    let parts: Vec<u8> = arg
        .split(',')
        .map(|x| x.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 6 {
        return None;
    }
    let ip = Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]);
    let port = (parts[4] as u16) << 8 | parts[5] as u16;
    Some(SocketAddr::new(IpAddr::V4(ip), port))
}

/// Parses `|proto|addr|port|`. The protocol field is not checked against the
/// address, which may be IPv4 or IPv6.
pub fn parse_eprt_argument(arg: &str) -> Option<SocketAddr> {
    let parts: Vec<&str> = arg.split('|').collect();
    if parts.len() != 5 {
        return None;
    }
    let ip: IpAddr = parts[2].parse().ok()?;
    let port: u16 = parts[3].parse().ok()?;
    Some(SocketAddr::new(ip, port))
}

/// Handles the PORT (Active Mode) FTP command.
pub async fn handle_port_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    session.data_channel.reset();
    match parse_port_argument(arg) {
        Some(addr) => {
            info!("Received PORT command with address {}", addr);
            session.data_channel.set_active(addr);
            writer.write_reply(200, "Port command successful").await?;
            Ok(())
        }
        None => Err(FtpError::protocol(501, "Port command failed")),
    }
}

pub async fn handle_eprt_command(
    writer: &mut ControlChannel,
    _context: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    session.data_channel.reset();
    match parse_eprt_argument(arg) {
        Some(addr) => {
            info!("Received EPRT command with address {}", addr);
            session.data_channel.set_active(addr);
            writer
                .write_reply(200, "Extended Port command successful")
                .await?;
            Ok(())
        }
        None => Err(FtpError::protocol(501, "Extended port command failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_argument() {
        assert_eq!(
            parse_port_argument("127,0,0,1,4,1"),
            Some("127.0.0.1:1025".parse().unwrap())
        );
        assert_eq!(parse_port_argument("127,0,0,1,4"), None);
        assert_eq!(parse_port_argument("127,0,0,1,4,1,1"), None);
        assert_eq!(parse_port_argument("127,0,0,256,4,1"), None);
        assert_eq!(parse_port_argument("a,b,c,d,e,f"), None);
        assert_eq!(parse_port_argument(""), None);
    }

    #[test]
    fn eprt_argument() {
        assert_eq!(
            parse_eprt_argument("|1|192.168.0.5|50000|"),
            Some("192.168.0.5:50000".parse().unwrap())
        );
        assert_eq!(
            parse_eprt_argument("|2|::1|50001|"),
            Some("[::1]:50001".parse().unwrap())
        );
        assert_eq!(parse_eprt_argument("|1|192.168.0.5|50000"), None);
        assert_eq!(parse_eprt_argument("|1|not-an-ip|50000|"), None);
        assert_eq!(parse_eprt_argument("|1|10.0.0.1|70000|"), None);
    }
}
