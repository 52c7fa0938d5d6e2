// src/fetcher/stub_server.rs
// A throwaway HTTP server for tests.

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

// A canned HTTP response for one request path (path includes the query)
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: &'static str,
}

// Starts a tiny HTTP/1.1 server on a random local port
//
// Each connection gets one response and is then closed. Unknown paths
// get a 404 with an HTML body. Returns the base URL to point at it.
pub async fn serve(routes: Vec<Route>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let routes = routes.clone();

            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let text = String::from_utf8_lossy(&request);
                let path = text.split_whitespace().nth(1).unwrap_or("/").to_string();

                let (status, body) = routes
                    .iter()
                    .find(|route| route.path == path)
                    .map(|route| (route.status, route.body))
                    .unwrap_or((404, "<html>not found</html>"));

                let response = format!(
                    "HTTP/1.1 {} Stub\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Url::parse(&format!("http://{}/", addr)).unwrap()
}
