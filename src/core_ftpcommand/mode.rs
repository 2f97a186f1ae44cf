use crate::helpers::send_response;
use crate::session::Session;
use log::warn;

/// Only stream mode exists.
pub async fn handle_mode_command(session: &mut Session, arg: String) -> Result<bool, std::io::Error> {
    if arg.trim().eq_ignore_ascii_case("S") {
        send_response(&mut session.writer, 200, "Mode set to S.").await?;
        return Ok(true);
    }
    warn!("Unsupported MODE: {}", arg);
    send_response(&mut session.writer, 504, "Bad MODE command.").await?;
    Ok(false)
}
