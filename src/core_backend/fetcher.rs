use crate::core_backend::BackendError;
use futures_util::StreamExt;
use log::{debug, error};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::SERVER;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Bytes escaped inside one path segment. `%` is included so that names
/// decoded from the listing reach the backend as the same resource.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Issues GET requests against the backend HTTP hosts.
///
/// The underlying client pools connections and is cheap to clone, so one
/// fetcher is shared by every session.
#[derive(Clone, Debug)]
pub struct BackendFetcher {
    client: Client,
}

/// An open backend resource. Dropping it releases the connection.
#[derive(Debug)]
pub struct BackendResponse {
    url: Url,
    response: reqwest::Response,
}

impl BackendFetcher {
    pub fn new(connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            // vhosts are reached directly, never through HTTP_PROXY
            .no_proxy()
            .user_agent(concat!("ftproxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Builds `http://<vhost><path>`, percent-encoding the path as needed.
    pub fn backend_url(vhost: &str, path: &str) -> Result<Url, BackendError> {
        let mut url = Url::parse(&format!("http://{}/", vhost)).map_err(|source| {
            BackendError::InvalidUrl {
                vhost: vhost.to_string(),
                source,
            }
        })?;
        let encoded = path
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        url.set_path(&encoded);
        Ok(url)
    }

    /// Opens `path` on `vhost`. Anything but `200 OK` is a failure.
    pub async fn open(&self, vhost: &str, path: &str) -> Result<BackendResponse, BackendError> {
        let url = Self::backend_url(vhost, path)?;
        debug!("Opening url: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| {
                error!("Error trying to GET url {}: {}", url, source);
                BackendError::Request {
                    url: url.to_string(),
                    source,
                }
            })?;

        if response.status() != StatusCode::OK {
            error!("GET {} returned {}", url, response.status());
            return Err(BackendError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(BackendResponse { url, response })
    }
}

impl BackendResponse {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The `Server` response header, used to pick the autoindex dialect.
    pub fn server(&self) -> Option<&str> {
        self.response
            .headers()
            .get(SERVER)
            .and_then(|value| value.to_str().ok())
    }

    /// Reads the whole body as text, replacing invalid UTF-8.
    pub async fn text(self) -> Result<String, BackendError> {
        let bytes = self.response.bytes().await.map_err(BackendError::Body)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Streams the body verbatim into `writer`, calling `on_chunk` after every
    /// chunk written. Returns the number of bytes copied.
    pub async fn copy_to<W, F>(self, writer: &mut W, mut on_chunk: F) -> Result<u64, BackendError>
    where
        W: AsyncWrite + Unpin,
        F: FnMut(usize),
    {
        let mut stream = self.response.bytes_stream();
        let mut copied: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(BackendError::Body)?;
            writer.write_all(&chunk).await?;
            copied += chunk.len() as u64;
            on_chunk(chunk.len());
        }
        writer.flush().await?;
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_listing::entry::name_from_href;
    use crate::test_support::{spawn_backend, Route};

    #[test]
    fn test_backend_url_encodes_path() {
        let url = BackendFetcher::backend_url("10.0.0.5:8080", "/pub/my file.txt").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5:8080/pub/my%20file.txt");
    }

    #[test]
    fn test_backend_url_escapes_percent() {
        let url = BackendFetcher::backend_url("h", "/d/100%.txt").unwrap();
        assert_eq!(url.as_str(), "http://h/d/100%25.txt");

        let url = BackendFetcher::backend_url("h", "/d/%41.txt").unwrap();
        assert_eq!(url.as_str(), "http://h/d/%2541.txt");
    }

    #[test]
    fn test_backend_url_rejects_garbage_vhost() {
        assert!(BackendFetcher::backend_url("bad host:port", "/").is_err());
    }

    #[tokio::test]
    async fn test_open_reads_server_header_and_body() {
        let addr = spawn_backend(vec![Route::ok("/hello.txt", "Apache/2.4.57", "hello world")]).await;
        let fetcher = BackendFetcher::new(Duration::from_secs(2)).unwrap();

        let response = fetcher.open(&addr.to_string(), "/hello.txt").await.unwrap();
        assert_eq!(response.server(), Some("Apache/2.4.57"));
        assert_eq!(response.text().await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn test_open_fails_on_missing_resource() {
        let addr = spawn_backend(vec![]).await;
        let fetcher = BackendFetcher::new(Duration::from_secs(2)).unwrap();

        let err = fetcher.open(&addr.to_string(), "/nope").await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_open_retrieves_listed_percent_name() {
        let addr = spawn_backend(vec![
            Route::ok("/d/100%25.txt", "Apache", "hundred"),
            Route::ok("/d/%41.txt", "Apache", "wrong file"),
        ])
        .await;
        let fetcher = BackendFetcher::new(Duration::from_secs(2)).unwrap();

        let name = name_from_href("100%25.txt").unwrap();
        assert_eq!(name, "100%.txt");
        let response = fetcher.open(&addr.to_string(), &format!("/d/{}", name)).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "hundred");

        // A file literally called "%41.txt" must not be served as "A.txt".
        let name = name_from_href("%2541.txt").unwrap();
        assert_eq!(name, "%41.txt");
        let err = fetcher
            .open(&addr.to_string(), &format!("/d/{}", name))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_copy_to_streams_body() {
        let body = "x".repeat(100_000);
        let addr = spawn_backend(vec![Route::ok("/big.bin", "nginx", &body)]).await;
        let fetcher = BackendFetcher::new(Duration::from_secs(2)).unwrap();

        let response = fetcher.open(&addr.to_string(), "/big.bin").await.unwrap();
        let mut sink = Vec::new();
        let mut chunks = 0;
        let copied = response.copy_to(&mut sink, |_| chunks += 1).await.unwrap();
        assert_eq!(copied, 100_000);
        assert_eq!(sink.len(), 100_000);
        assert!(chunks >= 1);
    }
}
