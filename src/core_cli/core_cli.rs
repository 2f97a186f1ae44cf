use crate::constants::DEFAULT_CONFIG_PATH;
use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ftproxy", about = "An FTP front-end for HTTP directory indexes.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Listen on this port instead of the configured one
    #[arg(short = 'p', long)]
    pub listen_port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
