use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Invalid backend URL for vhost {vhost}: {source}")]
    InvalidUrl {
        vhost: String,
        source: url::ParseError,
    },

    #[error("HTTP request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Backend answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read backend body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Failed to write to data connection: {0}")]
    Io(#[from] std::io::Error),
}
