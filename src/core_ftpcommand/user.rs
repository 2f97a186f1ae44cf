use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};

/// Handles the USER FTP command.
///
/// Stores the user name and asks for a password. Any name is accepted,
/// the login only gates the command tables.
///
/// # Arguments
///
/// * `session` - The session of the command connection.
/// * `username` - The user name provided by the client.
///
/// # Returns
///
/// Result<bool, std::io::Error>, `Err` only when the reply could not be sent.
pub async fn handle_user_command(session: &mut Session, username: String) -> Result<bool, std::io::Error> {
    if session.is_authenticated {
        warn!("USER from {} while logged in", session.username);
        send_response(&mut session.writer, 530, "Already logged-in.").await?;
        return Ok(false);
    }

    let username = username.trim();
    if username.is_empty() {
        warn!("USER command received with no arguments");
        send_response(&mut session.writer, 501, "Syntax error in parameters or arguments.").await?;
        return Ok(false);
    }

    info!("Received USER command with username: {}", username);
    session.username = username.to_string();
    send_response(
        &mut session.writer,
        331,
        &format!("Password required for {}", username),
    )
    .await?;
    Ok(true)
}
