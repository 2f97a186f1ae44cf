use crate::core_ftpcommand::utils::resolve_path;
use crate::core_network::pasv::{accept_data_connection, close_data_connection, require_passive};
use crate::helpers::{send_raw, send_response};
use crate::session::Session;
use log::{error, info};
use std::io;

/// Handles the LIST FTP command.
///
/// Lists `arg`, or the working directory, over the passive data connection.
/// The listing is synthesized from the backend index page after the data
/// connection is up, so a backend failure is reported as 526 after the 150.
pub async fn handle_list_command(session: &mut Session, arg: String) -> Result<bool, io::Error> {
    if !require_passive(session).await? {
        return Ok(false);
    }

    let dir = resolve_path(&session.current_dir, strip_list_options(&arg));
    let Some(mut data_stream) = accept_data_connection(session).await? else {
        return Ok(false);
    };

    send_response(&mut session.writer, 150, "Opening BINARY mode data connection for x.").await?;

    let listing = match session.context.synthesizer.dir_list(&dir).await {
        Ok(listing) => listing,
        Err(e) => {
            error!("LIST {} failed: {}", dir, e);
            drop(data_stream);
            send_response(&mut session.writer, 526, "Failed to send directory, please retry.").await?;
            return Ok(false);
        }
    };

    let sent = send_raw(&mut data_stream, listing.as_bytes()).await;
    close_data_connection(data_stream).await;
    if let Err(e) = sent {
        error!("Failed to send listing of {}: {}", dir, e);
        send_response(&mut session.writer, 526, "Failed to send directory, please retry.").await?;
        return Ok(false);
    }

    info!("Listed {}", dir);
    send_response(&mut session.writer, 226, "Directory send OK.").await?;
    Ok(true)
}

/// Drops `ls` style switches such as `-la` that many clients send.
fn strip_list_options(arg: &str) -> &str {
    let mut rest = arg;
    while rest.starts_with('-') {
        rest = match rest.split_once(char::is_whitespace) {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    rest
}
