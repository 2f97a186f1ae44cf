// src/constants.rs

pub const DEFAULT_CONFIG_PATH: &str = "/etc/ftproxy.toml";
pub const DEFAULT_BANNER: &str = "(FTProxy)";

/// Longest command line accepted on the control channel, CRLF included.
pub const MAX_COMMAND_LINE: usize = 4096;

pub const FEAT_REPLY: &str = "211-Features:\r\n MDTM\r\n SIZE\r\n EPSV\r\n211 End\r\n";

/// Size reported for directories, neither dialect exposes one.
pub const DIRECTORY_SIZE: u64 = 4096;
/// Size reported for a file whose size column could not be parsed.
/// Lying a little beats an empty field that confuses clients.
pub const UNKNOWN_FILE_SIZE: u64 = 3;

pub const MDTM_FORMAT: &str = "%Y%m%d%H%M%S";
