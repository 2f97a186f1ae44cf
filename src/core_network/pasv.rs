use crate::helpers::send_response;
use crate::session::{DtpState, Session};
use log::{debug, error, info, warn};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Handles PASV: opens the single-use data listener and reports it in
/// `h1,h2,h3,h4,p1,p2` form.
pub async fn handle_pasv_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    let Some(port) = open_pasv_listener(session, "PASV").await? else {
        return Ok(false);
    };
    let ip = session
        .context
        .config
        .server
        .pasv_ipv4()
        .or_else(|| advertised_ipv4(session.local_addr.ip()));
    send_response(&mut session.writer, 227, &pasv_reply(ip, port)).await?;
    Ok(true)
}

/// Handles EPSV: same listener as PASV, only the port is reported.
pub async fn handle_epsv_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    let Some(port) = open_pasv_listener(session, "EPSV").await? else {
        return Ok(false);
    };
    send_response(&mut session.writer, 229, &epsv_reply(port)).await?;
    Ok(true)
}

/// Binds an ephemeral port and parks it in the session. Returns the port,
/// or None when a reply refusing the command was already sent.
async fn open_pasv_listener(session: &mut Session, verb: &str) -> Result<Option<u16>, std::io::Error> {
    if session.pasv_listener.is_some() {
        warn!("{} while a passive listener is pending", verb);
        send_response(&mut session.writer, 526, "Already listening.").await?;
        return Ok(None);
    }

    let (listener, port) = match setup_pasv_listener(session.local_addr.ip()).await {
        Ok(bound) => bound,
        Err(e) => {
            error!("{} listener bind failed: {}", verb, e);
            send_response(&mut session.writer, 500, &format!("{} failed.", verb)).await?;
            return Ok(None);
        }
    };

    session.pasv_listener = Some(listener);
    session.dtp_state = DtpState::Passive;
    info!("{}: listening on port: {}", verb, port);
    Ok(Some(port))
}

/// Binds an ephemeral port on the address family of the command connection.
pub async fn setup_pasv_listener(local_ip: IpAddr) -> Result<(TcpListener, u16), std::io::Error> {
    let bind_ip = match local_ip {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    let listener = TcpListener::bind((bind_ip, 0)).await?;
    let port = listener.local_addr()?.port();
    debug!("PASV listener set up on {}:{}", bind_ip, port);
    Ok((listener, port))
}

/// The IPv4 address a PASV reply can carry for `local_ip`, if any.
pub fn advertised_ipv4(local_ip: IpAddr) -> Option<Ipv4Addr> {
    match local_ip {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}

/// Text of the 227 reply. Without an IPv4 address the host is 0,0,0,0.
pub fn pasv_reply(ip: Option<Ipv4Addr>, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.unwrap_or(Ipv4Addr::UNSPECIFIED).octets();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{}).",
        h1,
        h2,
        h3,
        h4,
        port >> 8,
        port & 0xFF
    )
}

/// Text of the 229 reply.
pub fn epsv_reply(port: u16) -> String {
    format!("Entering Extended Passive Mode (|||{}|).", port)
}

/// Refuses a data transfer unless PASV/EPSV went first. Returns false once
/// the refusal has been sent.
pub async fn require_passive(session: &mut Session) -> Result<bool, std::io::Error> {
    match session.dtp_state {
        DtpState::None => {
            send_response(&mut session.writer, 425, "Use PORT or PASV first.").await?;
            Ok(false)
        }
        DtpState::Active => {
            send_response(&mut session.writer, 425, "Only PASV implemented.").await?;
            Ok(false)
        }
        DtpState::Passive => Ok(true),
    }
}

/// Accepts the one connection the pending listener serves, then closes the
/// listener and leaves passive mode whatever the outcome.
///
/// Returns None after replying 500 when the accept fails.
pub async fn accept_data_connection(session: &mut Session) -> Result<Option<TcpStream>, std::io::Error> {
    accept_with(session, |listener| async move { listener.accept().await }).await
}

/// Hands the pending listener to `accept`, which owns and drops it.
async fn accept_with<F, Fut>(session: &mut Session, accept: F) -> Result<Option<TcpStream>, std::io::Error>
where
    F: FnOnce(TcpListener) -> Fut,
    Fut: Future<Output = std::io::Result<(TcpStream, SocketAddr)>>,
{
    session.dtp_state = DtpState::None;
    let Some(listener) = session.pasv_listener.take() else {
        send_response(&mut session.writer, 425, "Use PORT or PASV first.").await?;
        return Ok(None);
    };

    match accept(listener).await {
        Ok((data_stream, addr)) => {
            debug!("Accepted data connection from: {}", addr);
            Ok(Some(data_stream))
        }
        Err(e) => {
            error!("Failed to accept data connection: {}", e);
            send_response(&mut session.writer, 500, "Failed to accept data connection.").await?;
            Ok(None)
        }
    }
}

/// Flushes and half-closes a finished data connection before dropping it.
/// A failed shutdown only means the client already went away.
pub async fn close_data_connection<S>(mut data_stream: S)
where
    S: AsyncWrite + Unpin,
{
    if let Err(e) = data_stream.shutdown().await {
        debug!("Failed to shut down data connection: {}", e);
    }
}
