//! JSON fetch helper: Accept header, status mapping, cancellation.
use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {status} {status_text}")]
    Status { url: String, status: u16, status_text: String },
    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid request header {0:?}")]
    Header(String),
    #[error("cannot resolve {path:?} against {base}")]
    Url { base: String, path: String },
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool { matches!(self, FetchError::Cancelled { .. }) }
}

/// Per-request knobs. Caller headers are applied after `Accept` and may replace it.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub cancel: Option<CancellationToken>,
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn with_cancel(token: CancellationToken) -> Self {
        Self { cancel: Some(token), headers: Vec::new() }
    }
}

fn build_headers(extra: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    for (k, v) in extra {
        let name = HeaderName::from_bytes(k.as_bytes()).map_err(|_| FetchError::Header(k.clone()))?;
        let value = HeaderValue::from_str(v).map_err(|_| FetchError::Header(k.clone()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// GET `url` and decode the body as `T`. No retries here.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str, opts: &FetchOptions) -> Result<T, FetchError> {
    let headers = build_headers(&opts.headers)?;
    let request = async {
        let res = client.get(url).headers(headers).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = res.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url: url.to_string(), source })
    };
    let Some(token) = &opts.cancel else { return request.await };
    if token.is_cancelled() {
        return Err(FetchError::Cancelled { url: url.to_string() });
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(FetchError::Cancelled { url: url.to_string() }),
        res = request => res,
    }
}

/// Seam between the load cycle and the network.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// GET `path` relative to the site root and return the raw JSON body.
    async fn get_json(&self, path: &str, opts: &FetchOptions) -> Result<serde_json::Value, FetchError>;
}

/// Typed wrapper over [`Fetch::get_json`].
pub async fn get_typed<T: DeserializeOwned>(fetcher: &dyn Fetch, path: &str, opts: &FetchOptions) -> Result<T, FetchError> {
    let value = fetcher.get_json(path, opts).await?;
    serde_json::from_value(value).map_err(|source| FetchError::Decode { url: path.to_string(), source })
}

/// Fetches site assets relative to a base URL with one shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("portfolio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|_| FetchError::Url { base: self.base.to_string(), path: path.to_string() })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_json(&self, path: &str, opts: &FetchOptions) -> Result<serde_json::Value, FetchError> {
        let url = self.resolve(path)?;
        tracing::debug!(%url, "fetch");
        fetch_json(&self.client, url.as_str(), opts).await
    }
}
