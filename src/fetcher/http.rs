// src/fetcher/http.rs
// =============================================================================
// This module fetches search results over HTTP.
//
// Key functionality:
// - One shared reqwest Client for every target (connection pooling)
// - Relative targets are resolved against a base URL
// - Bodies are read as text and parsed as JSON
// - Status codes are ignored unless StatusPolicy::Strict is set
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - map_err: Turning library errors into our own FetchError
// =============================================================================

use super::{FetchError, JsonSource};
use crate::targets::RequestTarget;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

// What to do with a non-2xx response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Don't look at the status; if the body parses as JSON, it's a result
    #[default]
    Lenient,
    /// Any non-2xx status fails the fetch
    Strict,
}

// Knobs for building the HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub status_policy: StatusPolicy,
    /// Per-request timeout; None means wait as long as it takes
    pub timeout: Option<Duration>,
}

pub struct HttpSource {
    client: Client,
    base: Url,
    status_policy: StatusPolicy,
}

impl HttpSource {
    pub fn new(base: Url, options: &HttpOptions) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
            status_policy: options.status_policy,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl JsonSource for HttpSource {
    async fn fetch_json(&self, target: &RequestTarget) -> Result<Value, FetchError> {
        let url = target
            .resolve(&self.base)
            .map_err(|source| FetchError::InvalidTarget {
                target: target.name.clone(),
                source,
            })?;

        debug!(name = %target.name, %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(target, e))?;

        let status = response.status();
        debug!(name = %target.name, status = status.as_u16(), "response");

        if self.status_policy == StatusPolicy::Strict && !status.is_success() {
            return Err(FetchError::Status {
                target: target.name.clone(),
                status: status.as_u16(),
            });
        }

        // Read the whole body first so a broken connection mid-body is a
        // transport error, and only a complete-but-bad body is a parse error
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(target, e))?;

        serde_json::from_str(&body).map_err(|e| FetchError::parse(target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::stub_server::{serve, Route};
    use serde_json::json;
    use tokio::net::TcpListener;

    fn target(path: &str) -> RequestTarget {
        RequestTarget::new(path, path)
    }

    #[tokio::test]
    async fn test_fetches_and_parses_json() {
        let base = serve(vec![Route {
            path: "/portal/search-result?keyword=sonology&page=0",
            status: 200,
            body: r#"[{"id":1},{"id":2}]"#,
        }])
        .await;
        let source = HttpSource::new(base, &HttpOptions::default()).unwrap();

        let value = source
            .fetch_json(&target("portal/search-result?keyword=sonology&page=0"))
            .await
            .unwrap();

        assert_eq!(value, json!([{"id":1},{"id":2}]));
    }

    #[tokio::test]
    async fn test_lenient_accepts_json_error_body() {
        let base = serve(vec![Route {
            path: "/broken",
            status: 500,
            body: r#"{"error":"internal"}"#,
        }])
        .await;
        let source = HttpSource::new(base, &HttpOptions::default()).unwrap();

        let value = source.fetch_json(&target("broken")).await.unwrap();
        assert_eq!(value, json!({"error":"internal"}));
    }

    #[tokio::test]
    async fn test_lenient_non_json_body_is_parse_error() {
        let base = serve(vec![]).await;
        let source = HttpSource::new(base, &HttpOptions::default()).unwrap();

        let err = source.fetch_json(&target("missing")).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_strict_rejects_non_success_status() {
        let base = serve(vec![Route {
            path: "/broken",
            status: 500,
            body: r#"{"error":"internal"}"#,
        }])
        .await;
        let options = HttpOptions {
            status_policy: StatusPolicy::Strict,
            timeout: None,
        };
        let source = HttpSource::new(base, &options).unwrap();

        let err = source.fetch_json(&target("broken")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is very likely closed
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let base = Url::parse(&format!("http://{}/", addr)).unwrap();
        let source = HttpSource::new(base, &HttpOptions::default()).unwrap();

        let err = source.fetch_json(&target("anything")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
