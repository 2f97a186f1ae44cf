use crate::constants::DEFAULT_BANNER;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    pub listen_port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Public IPv4 advertised in PASV replies, for servers behind NAT.
    pub pasv_address: Option<String>,
    #[serde(default = "default_initial_timeout")]
    pub initial_timeout: u64, // seconds until the first command
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64, // seconds between two commands
    #[serde(default = "default_backend_connect_timeout")]
    pub backend_connect_timeout: u64,
    #[serde(default = "default_banner")]
    pub banner: String,
}

/// Maps virtual path prefixes onto backend HTTP hosts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VhostConfig {
    /// `host[:port]` used when no prefix matches.
    pub default: String,
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub vhosts: VhostConfig,
}

fn default_listen_address() -> String {
    String::from("0.0.0.0")
}

fn default_max_connections() -> usize {
    50
}

fn default_initial_timeout() -> u64 {
    60
}

fn default_idle_timeout() -> u64 {
    180
}

fn default_backend_connect_timeout() -> u64 {
    10
}

fn default_banner() -> String {
    DEFAULT_BANNER.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            listen_port: 2121,
            max_connections: default_max_connections(),
            pasv_address: None,
            initial_timeout: default_initial_timeout(),
            idle_timeout: default_idle_timeout(),
            backend_connect_timeout: default_backend_connect_timeout(),
            banner: default_banner(),
        }
    }
}

impl ServerConfig {
    pub fn initial_timeout(&self) -> Duration {
        Duration::from_secs(self.initial_timeout)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout)
    }

    pub fn backend_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_connect_timeout)
    }

    pub fn pasv_ipv4(&self) -> Option<Ipv4Addr> {
        self.pasv_address.as_deref().and_then(|a| a.parse().ok())
    }
}

impl VhostConfig {
    /// Returns the backend host serving `path`.
    ///
    /// The longest prefix wins, and a prefix only matches on a path component
    /// boundary so that `/pub` never captures `/public`.
    pub fn resolve(&self, path: &str) -> &str {
        self.prefixes
            .iter()
            .filter(|(prefix, _)| prefix_matches(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, vhost)| vhost.as_str())
            .unwrap_or(self.default.as_str())
    }

    /// Names of the top-level directories: the first component of every
    /// configured prefix, sorted and deduplicated.
    pub fn top_level_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .prefixes
            .keys()
            .filter_map(|prefix| prefix.trim_matches('/').split('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration file: {}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.server.initial_timeout == 0 || self.server.idle_timeout == 0 {
            bail!("timeouts must be greater than zero");
        }
        if let Some(addr) = &self.server.pasv_address {
            if addr.parse::<Ipv4Addr>().is_err() {
                bail!("pasv_address must be an IPv4 address, got {}", addr);
            }
        }
        if self.vhosts.default.trim().is_empty() {
            bail!("vhosts.default must not be empty");
        }
        for prefix in self.vhosts.prefixes.keys() {
            if !prefix.starts_with('/') {
                bail!("vhost prefix {} must start with '/'", prefix);
            }
        }
        Ok(())
    }
}
