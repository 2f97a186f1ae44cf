use crate::config::Config;
use crate::constants::DIRECTORY_SIZE;
use crate::core_backend::BackendFetcher;
use crate::core_listing::entry::{EntryKind, FsEntry};
use crate::core_listing::render::{format_mdtm, gen_dir_list};
use crate::core_listing::{apache, nginx, ListingError};
use crate::helpers::{clean_path, split_parent};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

/// Where a directory listing comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    /// The fabricated root: one directory per configured vhost prefix.
    Vhosts,
    Apache,
    Nginx,
}

impl ListingSource {
    /// Picks the dialect from the backend's `Server` header, Apache unless
    /// it says nginx.
    pub fn detect(server: Option<&str>) -> Self {
        match server {
            Some(server) if server.to_ascii_lowercase().contains("nginx") => ListingSource::Nginx,
            _ => ListingSource::Apache,
        }
    }
}

/// Size and MDTM timestamp of a remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: String,
}

pub struct Synthesizer {
    config: Arc<Config>,
    fetcher: BackendFetcher,
}

impl Synthesizer {
    pub fn new(config: Arc<Config>, fetcher: BackendFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Lists the entries of `dir`.
    ///
    /// A backend that cannot be reached, or that answers anything but 200,
    /// is an error, never an empty listing.
    pub async fn get_fs_objects(&self, dir: &str) -> Result<Vec<FsEntry>, ListingError> {
        let dir = clean_path(dir);
        if dir == "/" {
            debug!("GetFSObjects(): dir: {}, generating listing from vhosts", dir);
            return Ok(self.entries(ListingSource::Vhosts, ""));
        }

        let vhost = self.config.vhosts.resolve(&dir);
        let index_path = format!("{}/", dir);
        let response = self
            .fetcher
            .open(vhost, &index_path)
            .await
            .map_err(|source| ListingError::Fetch {
                path: dir.clone(),
                source,
            })?;

        let source = ListingSource::detect(response.server());
        debug!("Server header: {:?}, using {:?} parser", response.server(), source);
        let html = response.text().await.map_err(|source| ListingError::Fetch {
            path: dir.clone(),
            source,
        })?;

        let entries = self.entries(source, &html);
        info!("Listed {} entries in {}", entries.len(), dir);
        Ok(entries)
    }

    fn entries(&self, source: ListingSource, html: &str) -> Vec<FsEntry> {
        match source {
            ListingSource::Vhosts => {
                let now = Utc::now();
                self.config
                    .vhosts
                    .top_level_names()
                    .into_iter()
                    .map(|name| FsEntry {
                        kind: EntryKind::Dir,
                        name,
                        size: DIRECTORY_SIZE,
                        modified_at: now,
                    })
                    .collect()
            }
            ListingSource::Apache => apache::parse_index(html),
            ListingSource::Nginx => nginx::parse_index(html),
        }
    }

    /// LIST output for `dir`.
    pub async fn dir_list(&self, dir: &str) -> Result<String, ListingError> {
        let entries = self.get_fs_objects(dir).await?;
        Ok(gen_dir_list(&entries))
    }

    /// Looks `path` up in its parent's listing. Only files count.
    pub async fn file_stat(&self, path: &str) -> Option<FileStat> {
        let path = clean_path(path);
        let (parent, name) = split_parent(&path);
        let entries = match self.get_fs_objects(parent).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("FileStat({}) failed: {}", path, e);
                return None;
            }
        };
        let entry = entries.iter().find(|e| e.name == name && e.is_file())?;
        debug!("Found file {}, size is: {}, time is: {}", path, entry.size, entry.modified_at);
        Some(FileStat {
            size: entry.size,
            modified: format_mdtm(&entry.modified_at),
        })
    }

    /// Whether `path` names a remote directory. The root always does.
    pub async fn is_dir(&self, path: &str) -> bool {
        let path = clean_path(path);
        if path == "/" {
            return true;
        }
        let (parent, name) = split_parent(&path);
        match self.get_fs_objects(parent).await {
            Ok(entries) => entries.iter().any(|e| e.name == name && e.is_dir()),
            Err(e) => {
                warn!("IsDir({}) failed: {}", path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, VhostConfig};
    use crate::test_support::{spawn_backend, Route, APACHE_INDEX, NGINX_INDEX};
    use std::collections::BTreeMap;
    use std::net::SocketAddr;
    use std::time::Duration;

    fn synthesizer(backend: SocketAddr) -> Synthesizer {
        let mut prefixes = BTreeMap::new();
        prefixes.insert("/site".to_string(), backend.to_string());
        prefixes.insert("/mirror".to_string(), backend.to_string());
        let config = Config {
            server: ServerConfig::default(),
            vhosts: VhostConfig {
                default: "127.0.0.1:1".to_string(),
                prefixes,
            },
        };
        let fetcher = BackendFetcher::new(Duration::from_secs(2)).unwrap();
        Synthesizer::new(Arc::new(config), fetcher)
    }

    async fn backend() -> SocketAddr {
        spawn_backend(vec![
            Route::ok("/site/docs/", "Apache/2.4.57 (Debian)", APACHE_INDEX),
            Route::ok("/mirror/docs/", "nginx/1.24.0", NGINX_INDEX),
        ])
        .await
    }

    #[test]
    fn test_detect_dialect() {
        assert_eq!(ListingSource::detect(Some("nginx/1.24.0")), ListingSource::Nginx);
        assert_eq!(ListingSource::detect(Some("Apache/2.4")), ListingSource::Apache);
        assert_eq!(ListingSource::detect(None), ListingSource::Apache);
    }

    #[tokio::test]
    async fn test_root_lists_vhosts() {
        let synth = synthesizer(backend().await);
        let entries = synth.get_fs_objects("/").await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["mirror", "site"]);
        assert!(entries.iter().all(|e| e.is_dir() && e.size == DIRECTORY_SIZE));
    }

    #[tokio::test]
    async fn test_both_backends_list_the_same() {
        let synth = synthesizer(backend().await);
        let apache = synth.get_fs_objects("/site/docs").await.unwrap();
        let nginx = synth.get_fs_objects("/mirror/docs/").await.unwrap();
        assert_eq!(apache, nginx);
        assert_eq!(apache.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let synth = synthesizer(backend().await);
        assert!(synth.get_fs_objects("/site/missing").await.is_err());
        assert!(synth.dir_list("/site/missing").await.is_err());
    }

    #[tokio::test]
    async fn test_file_stat() {
        let synth = synthesizer(backend().await);
        let stat = synth.file_stat("/site/docs/readme.txt").await.unwrap();
        assert_eq!(stat.size, 1536);
        assert_eq!(stat.modified, "20230115103100");

        assert!(synth.file_stat("/site/docs/nothere.txt").await.is_none());
        // directories are not files
        assert!(synth.file_stat("/site/docs/pub").await.is_none());
    }

    #[tokio::test]
    async fn test_is_dir() {
        let synth = synthesizer(backend().await);
        assert!(synth.is_dir("/").await);
        assert!(synth.is_dir("/site").await);
        assert!(synth.is_dir("/site/docs/pub").await);
        assert!(!synth.is_dir("/site/docs/readme.txt").await);
        assert!(!synth.is_dir("/nowhere").await);
    }

    #[tokio::test]
    async fn test_dir_list_renders_lines() {
        let synth = synthesizer(backend().await);
        let listing = synth.dir_list("/site/docs").await.unwrap();
        let lines: Vec<&str> = listing.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("drwxr-xr-x 1 ftp ftp 4096 Jan 15  2023 pub"));
        assert_eq!(lines[1], "-rwxr-xr-x 1 ftp ftp 1536 Jan 15  2023 readme.txt");
    }
}
