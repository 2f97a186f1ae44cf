mod config;
mod constants;
mod core_backend;
mod core_cli;
mod core_ftpcommand;
mod core_listing;
mod core_log;
mod core_network;
mod helpers;
mod server;
mod session;
mod watchdog;

#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::core_cli::Cli;
use crate::core_log::logger::init_logger;
use anyhow::Result;
use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(args.verbose);

    // Load configuration from the TOML file
    let mut config = Config::load_from_file(&args.config)?;
    info!("Loaded configuration from {}", args.config);

    // Override listen port from CLI if provided
    if let Some(listen_port) = args.listen_port {
        config.server.listen_port = listen_port;
    }

    // Run the FTP proxy
    server::run(config).await?;

    Ok(())
}
