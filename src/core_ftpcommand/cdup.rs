use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::session::Session;

/// CDUP is `CWD ..`.
pub async fn handle_cdup_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    handle_cwd_command(session, String::from("..")).await
}
