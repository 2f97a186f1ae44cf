// src/core_ftpcommand/pwd.rs
use crate::helpers::send_response;
use crate::session::Session;

pub async fn handle_pwd_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    let reply = format!("\"{}\"", session.current_dir);
    send_response(&mut session.writer, 257, &reply).await?;
    Ok(true)
}
