// In-process HTTP backend and canned autoindex pages used by the unit tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Apache 2.4 fancy index of a directory holding `pub/` and a 1.5K `readme.txt`.
pub const APACHE_INDEX: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 3.2 Final//EN">
<html>
 <head>
  <title>Index of /site/docs</title>
 </head>
 <body>
<h1>Index of /site/docs</h1>
  <table>
   <tr><th valign="top"><img src="/icons/blank.gif" alt="[ICO]"></th><th><a href="?C=N;O=D">Name</a></th><th><a href="?C=M;O=A">Last modified</a></th><th><a href="?C=S;O=A">Size</a></th><th><a href="?C=D;O=A">Description</a></th></tr>
   <tr><th colspan="5"><hr></th></tr>
<tr><td valign="top"><img src="/icons/back.gif" alt="[PARENTDIR]"></td><td><a href="/site/">Parent Directory</a></td><td>&nbsp;</td><td align="right">  - </td><td>&nbsp;</td></tr>
<tr><td valign="top"><img src="/icons/folder.gif" alt="[DIR]"></td><td><a href="pub/">pub/</a></td><td align="right">2023-01-15 10:30  </td><td align="right">  - </td><td>&nbsp;</td></tr>
<tr><td valign="top"><img src="/icons/text.gif" alt="[TXT]"></td><td><a href="readme.txt">readme.txt</a></td><td align="right">2023-01-15 10:31  </td><td align="right">1.5K</td><td>&nbsp;</td></tr>
   <tr><th colspan="5"><hr></th></tr>
</table>
<address>Apache/2.4.57 (Debian) Server at localhost Port 80</address>
</body></html>
"#;

/// nginx autoindex of the same directory.
pub const NGINX_INDEX: &str = r#"<html>
<head><title>Index of /site/docs/</title></head>
<body>
<h1>Index of /site/docs/</h1><hr><pre><a href="../">../</a>
<a href="pub/">pub/</a>                                               15-Jan-2023 10:30                   -
<a href="readme.txt">readme.txt</a>                                         15-Jan-2023 10:31                1536
</pre><hr></body>
</html>
"#;

#[derive(Clone, Debug)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub server: String,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(path: &str, server: &str, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            server: server.to_string(),
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Serves `routes` on an ephemeral localhost port until the test ends.
/// Unknown paths answer 404.
pub async fn spawn_backend(routes: Vec<Route>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes: Arc<HashMap<String, Route>> =
        Arc::new(routes.into_iter().map(|r| (r.path.clone(), r)).collect());

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buffer[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let (status, server, body) = match routes.get(&path) {
                    Some(route) => (route.status, route.server.clone(), route.body.clone()),
                    None => (404, "mock".to_string(), b"not found".to_vec()),
                };
                let head = format!(
                    "HTTP/1.1 {} X\r\nServer: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    server,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
