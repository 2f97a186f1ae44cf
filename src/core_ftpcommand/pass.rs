use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};

/// PASS completes the login started by USER. The password is not checked.
pub async fn handle_pass_command(session: &mut Session, _password: String) -> Result<bool, std::io::Error> {
    if session.username.is_empty() {
        warn!("PASS without USER");
        send_response(&mut session.writer, 503, "Login with USER first.").await?;
        return Ok(false);
    }
    if session.is_authenticated {
        send_response(&mut session.writer, 503, "Already logged in.").await?;
        return Ok(false);
    }

    session.is_authenticated = true;
    info!("User {} logged in", session.username);
    let reply = format!("User {} logged in", session.username);
    send_response(&mut session.writer, 230, &reply).await?;
    Ok(true)
}
