use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};

/// Moves the working directory to `arg` once the backend confirms it is a
/// directory. On failure the working directory is left alone.
pub async fn handle_cwd_command(session: &mut Session, arg: String) -> Result<bool, std::io::Error> {
    let new_dir = resolve_path(&session.current_dir, &arg);

    if session.context.synthesizer.is_dir(&new_dir).await {
        info!("Directory successfully changed to: {}", new_dir);
        session.current_dir = new_dir;
        send_response(&mut session.writer, 250, "Directory successfully changed.").await?;
        Ok(true)
    } else {
        warn!("Failed to change directory to: {}", new_dir);
        let reply = format!("{}: No such file or directory", new_dir);
        send_response(&mut session.writer, 550, &reply).await?;
        Ok(false)
    }
}
