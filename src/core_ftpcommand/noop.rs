use crate::helpers::send_response;
use crate::session::Session;

pub async fn handle_noop_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    send_response(&mut session.writer, 200, "NOOP ok.").await?;
    Ok(true)
}
