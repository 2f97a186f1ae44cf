use crate::helpers::send_response;
use crate::session::Session;
use log::info;

/// Handles the SYST (System) FTP command.
///
/// Clients use the answer to pick a listing parser, and the synthesized
/// listings are Unix style.
pub async fn handle_syst_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    info!("Responding to SYST command with system type.");
    send_response(&mut session.writer, 215, "UNIX Type: L8").await?;
    Ok(true)
}
