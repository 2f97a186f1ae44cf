use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};

pub async fn handle_mdtm_command(session: &mut Session, arg: String) -> Result<bool, std::io::Error> {
    if arg.trim().is_empty() {
        warn!("MDTM command received with no arguments");
        send_response(&mut session.writer, 501, "Syntax error in parameters or arguments.").await?;
        return Ok(false);
    }

    let path = resolve_path(&session.current_dir, &arg);
    match session.context.synthesizer.file_stat(&path).await {
        Some(stat) => {
            info!("MDTM {}: {}", path, stat.modified);
            send_response(&mut session.writer, 213, &stat.modified).await?;
            Ok(true)
        }
        None => {
            send_response(&mut session.writer, 550, "Could not get file modification time.").await?;
            Ok(false)
        }
    }
}
