//! HTTP transport abstraction.
//!
//! The client builds an [`ApiRequest`] per operation and hands it to a
//! [`Transport`]. [`HttpTransport`] speaks to a real daemon through
//! `reqwest`; tests substitute an in-memory implementation.

use std::io::Read;
use std::time::Duration;

use dockwire_common::config::ClientConfig;
use dockwire_common::constants::JSON_MEDIA_TYPE;
use dockwire_common::error::{DockwireError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use reqwest::Method;

/// Body attached to a request together with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// Raw body bytes.
    pub bytes: Vec<u8>,
}

/// A single request against the remote API, relative to the API root.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below the API root, starting with `/`.
    pub path: String,
    /// Query parameters in the order they were added.
    pub query: Vec<(&'static str, String)>,
    /// Media type requested through the `Accept` header.
    pub accept: Option<&'static str>,
    /// Optional request body.
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    /// Creates a request with no query, headers, or body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            accept: None,
            body: None,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Appends a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Sets the `Accept` media type.
    #[must_use]
    pub const fn accept(mut self, media_type: &'static str) -> Self {
        self.accept = Some(media_type);
        self
    }

    /// Attaches a raw body with the given media type.
    #[must_use]
    pub fn body(mut self, content_type: &'static str, bytes: Vec<u8>) -> Self {
        self.body = Some(RequestBody {
            content_type,
            bytes,
        });
        self
    }

    /// Serializes `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self.body(JSON_MEDIA_TYPE, bytes))
    }

    /// Builds the transport error for a failed exchange of this request.
    #[must_use]
    pub fn failure(&self, message: impl Into<String>) -> DockwireError {
        DockwireError::Transport {
            method: self.method.to_string(),
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

/// Status line and unread body of a response.
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status code.
    pub reason: String,
    body: Box<dyn Read + Send>,
}

impl ApiResponse {
    /// Wraps a status line and a body reader.
    pub fn new(status: u16, reason: impl Into<String>, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: Box::new(body),
        }
    }

    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Reads the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the body cannot be read.
    pub fn bytes(mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        let _ = self.body.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Reads the whole body as text, replacing invalid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the body cannot be read.
    pub fn text(self) -> std::io::Result<String> {
        self.bytes().map(|buf| String::from_utf8_lossy(&buf).into_owned())
    }

    /// Decodes the body as a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Serialization` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_reader(self.body)?)
    }

    /// Hands over the body for incremental consumption.
    #[must_use]
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.body
    }
}

impl std::fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// A request/response exchange with the daemon.
///
/// Implementations must not interpret status codes; classification belongs
/// to the caller.
pub trait Transport: Send + Sync {
    /// Performs one exchange.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Transport` if no response could be obtained.
    fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Blocking HTTP transport over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport for the configured daemon.
    ///
    /// Without a configured timeout requests may block indefinitely, which
    /// long builds rely on.
    ///
    /// # Errors
    ///
    /// Returns `DockwireError::Config` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| DockwireError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: format!("{}{}", config.api_root, config.version_prefix()),
        })
    }

    /// Absolute URL for a path below the API root.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }
        if let Some(body) = request.body.take() {
            builder = builder
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = builder.send().map_err(|e| request.failure(e.to_string()))?;
        let status = response.status();
        tracing::debug!(method = %request.method, %url, status = status.as_u16(), "received response");
        Ok(ApiResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            response,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_query_in_order() {
        let req = ApiRequest::post("/build")
            .query("q", "1")
            .query_opt("t", None)
            .query_opt("repo", Some("web"));
        assert_eq!(
            req.query,
            vec![("q", "1".to_string()), ("repo", "web".to_string())]
        );
    }

    #[test]
    fn json_body_sets_media_type() {
        let req = ApiRequest::post("/containers/create")
            .json(&serde_json::json!({"Image": "busybox"}))
            .unwrap();
        let body = req.body.unwrap();
        assert_eq!(body.content_type, "application/json");
        assert_eq!(body.bytes, br#"{"Image":"busybox"}"#);
    }

    #[test]
    fn failure_names_method_and_path() {
        let err = ApiRequest::delete("/containers/abc").failure("connection refused");
        assert_eq!(err.to_string(), "DELETE /containers/abc failed: connection refused");
    }

    #[test]
    fn response_success_range() {
        assert!(ApiResponse::new(204, "No Content", std::io::empty()).is_success());
        assert!(!ApiResponse::new(304, "Not Modified", std::io::empty()).is_success());
        assert!(!ApiResponse::new(404, "Not Found", std::io::empty()).is_success());
    }

    #[test]
    fn response_decodes_json_body() {
        let resp = ApiResponse::new(201, "Created", &br#"{"Id":"e90e34656806"}"#[..]);
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["Id"], "e90e34656806");
    }

    #[test]
    fn response_text_replaces_invalid_utf8() {
        let resp = ApiResponse::new(200, "OK", &b"page not found\xff"[..]);
        assert_eq!(resp.text().unwrap(), "page not found\u{fffd}");
    }

    #[test]
    fn http_transport_sends_body_with_its_media_type() {
        use std::io::{BufRead, BufReader, Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let daemon = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut head = Vec::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                let _ = reader.read_line(&mut line).unwrap();
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                head.push(line);
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();
            reader
                .get_mut()
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .unwrap();
            (head, body)
        });

        let config = ClientConfig::new(&format!("http://{addr}")).unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        let context = b"FROM busybox\n".to_vec();
        let response = transport
            .send(ApiRequest::post("/build").query("q", "1").body("application/tar", context.clone()))
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text().unwrap(), "ok");

        let (head, body) = daemon.join().unwrap();
        assert_eq!(head[0], "POST /build?q=1 HTTP/1.1");
        assert!(head.iter().any(|h| h.eq_ignore_ascii_case("content-type: application/tar")));
        assert_eq!(body, context);
    }

    #[test]
    fn http_transport_prefixes_api_version() {
        let config = ClientConfig {
            api_version: Some("1.41".into()),
            ..ClientConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.url("/containers/abc/json"),
            "http://localhost:2375/v1.41/containers/abc/json"
        );
    }
}
