use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::pasv::{accept_data_connection, close_data_connection, require_passive};
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};

/// Handles the RETR (Retrieve) FTP command.
///
/// The file is opened on its backend before the data connection is
/// accepted, so a missing file never leaves the client waiting on a data
/// port. The body is streamed as is and every chunk counts as activity
/// for the idle watchdog.
///
/// # Arguments
///
/// * `session` - The session of the command connection.
/// * `arg` - The file, absolute or relative to the working directory.
///
/// # Returns
///
/// Result<bool, std::io::Error>, `Err` only when the control channel broke.
pub async fn handle_retr_command(session: &mut Session, arg: String) -> Result<bool, std::io::Error> {
    if arg.trim().is_empty() {
        warn!("RETR command received with no arguments");
        send_response(&mut session.writer, 501, "Syntax error in parameters or arguments.").await?;
        return Ok(false);
    }
    if !require_passive(session).await? {
        return Ok(false);
    }

    let path = resolve_path(&session.current_dir, &arg);
    let context = session.context.clone();
    let vhost = context.config.vhosts.resolve(&path);

    let response = match context.backend.open(vhost, &path).await {
        Ok(response) => response,
        Err(e) => {
            error!("File not found or could not be opened: {}, error: {}", path, e);
            session.close_pasv_listener();
            send_response(&mut session.writer, 550, "Failed to open file.").await?;
            return Ok(false);
        }
    };

    let Some(mut data_stream) = accept_data_connection(session).await? else {
        return Ok(false);
    };

    send_response(&mut session.writer, 150, "Opening BINARY mode data connection for x.").await?;
    info!("Sending file: {} from {}", path, response.url());

    let idle_timeout = context.config.server.idle_timeout();
    let watchdog = &session.watchdog;
    let copied = response
        .copy_to(&mut data_stream, |_| watchdog.reset(idle_timeout))
        .await;
    close_data_connection(data_stream).await;

    match copied {
        Ok(bytes) => {
            info!("File transfer completed successfully: {} ({} bytes)", path, bytes);
            send_response(&mut session.writer, 226, "Transfer complete.").await?;
            Ok(true)
        }
        Err(e) => {
            error!("Error sending file {} to client: {}", path, e);
            send_response(&mut session.writer, 550, "Failed to open file.").await?;
            Ok(false)
        }
    }
}
