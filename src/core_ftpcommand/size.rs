// core_ftpcommand/size.rs

use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};

/// Handles the SIZE (File Size) FTP command.
///
/// The size comes from the parent directory's index page, so it is only as
/// exact as the backend prints it (`1.5K` reads as 1536).
///
/// # Arguments
///
/// * `session` - The session of the command connection.
/// * `arg` - The file, absolute or relative to the working directory.
pub async fn handle_size_command(session: &mut Session, arg: String) -> Result<bool, std::io::Error> {
    if arg.trim().is_empty() {
        warn!("SIZE command received with no arguments");
        send_response(&mut session.writer, 501, "Syntax error in parameters or arguments.").await?;
        return Ok(false);
    }

    let path = resolve_path(&session.current_dir, &arg);
    match session.context.synthesizer.file_stat(&path).await {
        Some(stat) => {
            info!("File size for {} is {}", path, stat.size);
            send_response(&mut session.writer, 213, &stat.size.to_string()).await?;
            Ok(true)
        }
        None => {
            send_response(&mut session.writer, 550, "Could not get file size.").await?;
            Ok(false)
        }
    }
}
