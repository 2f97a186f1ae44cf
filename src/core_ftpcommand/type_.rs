use crate::helpers::send_response;
use crate::session::Session;
use log::warn;

/// Handles the TYPE FTP command.
///
/// Transfers are always binary, so `A`, `A T` and `I` are accepted without
/// changing anything. Other types are refused, yet the command still counts
/// as handled.
///
/// # Arguments
///
/// * `session` - The session of the command connection.
/// * `arg` - The requested representation type.
pub async fn handle_type_command(session: &mut Session, arg: String) -> Result<bool, std::io::Error> {
    let parts: Vec<String> = arg.split_whitespace().map(|s| s.to_ascii_uppercase()).collect();
    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();

    match parts.as_slice() {
        ["A"] | ["A", "T"] => {
            send_response(&mut session.writer, 200, "Switching to ASCII mode.").await?;
        }
        ["I"] => {
            send_response(&mut session.writer, 200, "Switching to Binary mode.").await?;
        }
        _ => {
            warn!("Unrecognised TYPE: {}", arg);
            send_response(&mut session.writer, 500, "Unrecognised TYPE command.").await?;
        }
    }
    Ok(true)
}
