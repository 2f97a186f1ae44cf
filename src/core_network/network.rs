use crate::constants::MAX_COMMAND_LINE;
use crate::core_ftpcommand::ftpcommand::Command;
use crate::core_ftpcommand::handlers::CommandTables;
use crate::helpers::send_response;
use crate::server::{initialize_session, ServerContext};
use crate::session::{Session, TeardownReason};
use anyhow::Result;
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};

/// Accepts command connections forever. Each admitted connection gets its
/// own task; refused ones get a 421 and are closed.
pub async fn start_server(listener: TcpListener, context: Arc<ServerContext>) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        info!("New connection from {:?}", addr);

        let local_addr = match socket.local_addr() {
            Ok(local_addr) => local_addr,
            Err(e) => {
                error!("Cannot read local address of {:?}: {}", addr, e);
                continue;
            }
        };

        if !context.admission.admit().await {
            tokio::spawn(reject_connection(socket, addr));
            continue;
        }

        let context = Arc::clone(&context);
        tokio::spawn(async move {
            handle_connection(socket, local_addr, context).await;
            info!("Connection closed for {:?}", addr);
        });
    }
}

async fn reject_connection(mut socket: TcpStream, addr: SocketAddr) {
    if let Err(e) = send_response(&mut socket, 421, "Too many connections.").await {
        debug!("Could not send 421 to {:?}: {}", addr, e);
    }
    let _ = socket.shutdown().await;
}

/// Serves one admitted command connection until it is torn down.
pub async fn handle_connection(socket: TcpStream, local_addr: SocketAddr, context: Arc<ServerContext>) {
    let (reader, writer) = socket.into_split();
    let mut session = initialize_session(writer, local_addr, context);
    let teardown = Arc::clone(&session.teardown);

    if let Some(reason) = command_loop(&mut session, reader).await {
        teardown.run(reason).await;
    }
    debug!("Session ended: {:?}", session);
    // dropping the session closes the pending listener and the command socket
    drop(session);
}

/// Reads and dispatches commands. Returns the reason the session should end,
/// or None when something else already tore it down.
async fn command_loop(session: &mut Session, reader: OwnedReadHalf) -> Option<TeardownReason> {
    let teardown = Arc::clone(&session.teardown);
    let tables = CommandTables::new();
    let idle_timeout = session.context.config.server.idle_timeout();
    let banner = session.context.config.server.banner.clone();

    if let Err(e) = send_response(&mut session.writer, 220, &banner).await {
        error!("Failed to send banner: {}", e);
        return Some(TeardownReason::ControlError);
    }

    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::with_capacity(256);

    loop {
        buffer.clear();
        let mut limited = (&mut reader).take(MAX_COMMAND_LINE as u64);
        let read = tokio::select! {
            biased;
            _ = teardown.closed() => return None,
            read = limited.read_until(b'\n', &mut buffer) => read,
        };

        match read {
            Ok(0) => {
                info!("Client disconnected");
                return Some(TeardownReason::Disconnected);
            }
            Ok(n) if n >= MAX_COMMAND_LINE && !buffer.ends_with(b"\n") => {
                warn!("Command line longer than {} bytes", MAX_COMMAND_LINE);
                let _ = send_response(&mut session.writer, 500, "Command line too long.").await;
                return Some(TeardownReason::ControlError);
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read command: {}", e);
                return Some(TeardownReason::ControlError);
            }
        }

        let command = Command::parse(&String::from_utf8_lossy(&buffer));
        session.watchdog.reset(idle_timeout);
        if command.verb == "PASS" {
            info!("Received command: PASS ****");
        } else {
            info!("Received command: {} {}", command.verb, command.args);
        }

        let handled = tokio::select! {
            biased;
            _ = teardown.closed() => return None,
            handled = tables.dispatch(session, command) => handled,
        };
        if let Err(e) = handled {
            error!("Error writing to control connection: {}", e);
            return Some(TeardownReason::ControlError);
        }
    }
}
