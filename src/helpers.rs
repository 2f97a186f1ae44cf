use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sends a single line reply, `<code> <text>\r\n`.
pub async fn send_response<W>(writer: &mut W, code: u16, text: &str) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    debug!("<= {} {}", code, text);
    send_raw(writer, format!("{} {}\r\n", code, text).as_bytes()).await
}

/// Sends preformatted bytes, multi-line replies included.
pub async fn send_raw<W>(writer: &mut W, message: &[u8]) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

/// Lexically normalizes an absolute virtual path: `.` and empty components
/// vanish, `..` pops (never above the root), no trailing slash.
pub fn clean_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Splits a clean path into parent directory and leaf name.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", name)) => ("/", name),
        Some((parent, name)) => (parent, name),
        None => ("/", path),
    }
}
