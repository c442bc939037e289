use crate::core::error::{ReconError, Result};
use curl::easy::{Easy2, Handler, WriteError};
use std::sync::Arc;
use std::time::Duration;

/// Desktop browser identity sent to social platforms
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Collector for response data
struct Collector(Vec<u8>);

impl Handler for Collector {
    fn write(&mut self, data: &[u8]) -> std::result::Result<usize, WriteError> {
        self.0.extend_from_slice(data);
        Ok(data.len())
    }
}

/// A single bounded GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == 429
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// Blocking HTTP transport. Implementations are shared between modules, so
/// they must not keep per-request state between calls.
#[cfg_attr(test, mockall::automock)]
pub trait HttpFetch: Send + Sync {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// HTTP transport using libcurl. Every request gets a fresh handle that is
/// dropped when the request finishes, whatever the outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlHttp;

impl HttpFetch for CurlHttp {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut easy = Easy2::new(Collector(Vec::new()));

        easy.url(&request.url)?;
        easy.timeout(request.timeout)?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.ssl_verify_peer(true)?;
        easy.ssl_verify_host(true)?;

        let mut list = curl::easy::List::new();
        for (key, value) in &request.headers {
            list.append(&format!("{}: {}", key, value))?;
        }
        easy.http_headers(list)?;

        easy.perform()?;

        let response_code = easy.response_code()?;
        let status_code = u16::try_from(response_code)
            .map_err(|_| ReconError::Http(format!("Invalid status code: {}", response_code)))?;
        let body = std::mem::take(&mut easy.get_mut().0);

        Ok(HttpResponse { status_code, body })
    }
}

/// Run a blocking request on the blocking pool so the caller can be
/// suspended while it is in flight.
pub async fn fetch(http: Arc<dyn HttpFetch>, request: HttpRequest) -> Result<HttpResponse> {
    tokio::task::spawn_blocking(move || http.get(&request))
        .await
        .map_err(|e| ReconError::Unknown(format!("Task join error: {}", e)))?
}
