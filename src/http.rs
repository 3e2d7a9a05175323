use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use url::Url;

const USER_AGENT: &str = concat!("rpc-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// A blocking [`Client`] bound to a base URL.
///
/// Cloning is cheap and the clones share one connection pool. Request
/// builders are handed back untouched, so headers, bodies and per-request
/// timeouts stay with the caller and errors surface as plain
/// [`reqwest::Error`] at send time.
#[derive(Debug, Clone)]
pub struct SharedClient {
    client: Client,
    base_url: String,
}

impl SharedClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// The base URL exactly as it was configured.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prefix `path` with the base URL, joined by a single `/`.
    ///
    /// Absolute URLs are returned as they are and an empty path yields the
    /// base URL unchanged.
    pub fn url(&self, path: &str) -> String {
        if Url::parse(path).is_ok_and(|url| url.has_host()) {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{method} {url}");
        self.client.request(method, url)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }
}
