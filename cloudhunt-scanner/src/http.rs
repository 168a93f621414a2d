use crate::error::{Result, ScanError};
use reqwest::header::{HeaderMap, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/77.0.3865.120 Safari/537.36";

/// Timeout for candidate probes, DNS checks and provider API calls
pub const PROBE_TIMEOUT_SECS: u64 = 7;
/// Timeout for crawler page fetches
pub const CRAWL_TIMEOUT_SECS: u64 = 5;
/// Timeout for Azure share/container listings
pub const LISTING_TIMEOUT_SECS: u64 = 15;

const MAX_REDIRECTS: usize = 10;

/// A response after all redirects were followed
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// URL of the last hop
    pub final_url: String,
    /// Status codes of every redirect hop, in order
    pub history: Vec<u16>,
    pub body: Option<String>,
}

impl ProbeResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Thin wrapper around reqwest that follows redirects itself so the redirect
/// history stays observable.
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new() -> Result<Self> {
        Self::with_timeout(PROBE_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// HEAD request without reading a body
    pub async fn head(&self, url: &str) -> Result<ProbeResponse> {
        self.send(Method::HEAD, url, false, None).await
    }

    /// GET request, reading the body as text
    pub async fn get(&self, url: &str) -> Result<ProbeResponse> {
        self.send(Method::GET, url, true, None).await
    }

    /// GET with a timeout overriding the client default
    pub async fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<ProbeResponse> {
        self.send(Method::GET, url, true, Some(timeout)).await
    }

    /// Probe `http://{host}`. A 404 is reported as no answer.
    pub async fn check_host(&self, host: &str) -> Option<ProbeResponse> {
        match self.head(&format!("http://{}", host)).await {
            Ok(response) if response.status == StatusCode::NOT_FOUND.as_u16() => None,
            Ok(response) => Some(response),
            Err(e) => {
                debug!("No HTTP answer from {}: {}", host, e);
                None
            }
        }
    }

    /// The timeout bounds the whole exchange, redirect hops included
    async fn send(
        &self,
        method: Method,
        url: &str,
        read_body: bool,
        timeout: Option<Duration>,
    ) -> Result<ProbeResponse> {
        let limit = timeout.unwrap_or(self.timeout);
        tokio::time::timeout(limit, self.follow(method, url, read_body, limit))
            .await
            .map_err(|_| ScanError::Timeout(format!("{} after {:?}", url, limit)))?
    }

    async fn follow(
        &self,
        method: Method,
        url: &str,
        read_body: bool,
        limit: Duration,
    ) -> Result<ProbeResponse> {
        let mut current =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
        let mut history = Vec::new();

        loop {
            let response = self
                .client
                .request(method.clone(), current.clone())
                .timeout(limit)
                .send()
                .await?;
            let status = response.status();

            let next = status
                .is_redirection()
                .then(|| response.headers().get(LOCATION))
                .flatten()
                .and_then(|v| v.to_str().ok())
                .and_then(|location| current.join(location).ok());

            if let Some(next) = next {
                if history.len() == MAX_REDIRECTS {
                    return Err(ScanError::TooManyRedirects(url.to_string()));
                }
                debug!("{} -> {} ({})", current, next, status.as_u16());
                history.push(status.as_u16());
                current = next;
                continue;
            }

            let headers = response.headers().clone();
            let body = if read_body {
                Some(response.text().await?)
            } else {
                None
            };

            return Ok(ProbeResponse {
                status: status.as_u16(),
                headers,
                final_url: current.to_string(),
                history,
                body,
            });
        }
    }
}
