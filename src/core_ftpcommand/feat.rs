use crate::constants::FEAT_REPLY;
use crate::helpers::send_raw;
use crate::session::Session;

pub async fn handle_feat_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    send_raw(&mut session.writer, FEAT_REPLY.as_bytes()).await?;
    Ok(true)
}
