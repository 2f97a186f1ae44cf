use env_logger::{Builder, Env};
use std::io::Write;

/// Initializes the logger with the daemon's line format,
/// `[timestamp] [LEVEL] message`. `RUST_LOG` wins over `verbose`.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();
}
