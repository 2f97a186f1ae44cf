use crate::helpers::send_response;
use crate::session::{Session, TeardownReason};
use log::{error, info};
use tokio::io::AsyncWriteExt;

/// Handles the QUIT FTP command.
///
/// Says goodbye, closes the command connection and any pending passive
/// listener, then tears the session down. The command loop notices the
/// teardown and stops reading.
pub async fn handle_quit_command(session: &mut Session, _arg: String) -> Result<bool, std::io::Error> {
    info!("Received QUIT command. Closing connection.");
    session.watchdog.stop();

    if let Err(e) = send_response(&mut session.writer, 221, "Goodbye.").await {
        error!("Failed to send QUIT response: {}", e);
    }
    if let Err(e) = session.writer.shutdown().await {
        error!("Failed to shut down command connection: {}", e);
    }
    session.close_pasv_listener();
    session.teardown.run(TeardownReason::Quit).await;
    Ok(true)
}
