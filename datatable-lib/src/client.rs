//! HTTP list client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use url::Url;

use crate::error::Error;
use crate::error::FetchError;
use crate::fetch::ListRequest;
use crate::fetch::ListResponse;
use crate::fetch::ListSource;

/// HTTP client for paginated REST list endpoints.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared by
/// any number of tables; each table still fetches independently.
///
/// # Example
///
/// ```ignore
/// use datatable_lib::ListClient;
///
/// let client = ListClient::builder()
///     .url("https://inventory.example.com/api/")
///     .bearer_token("my-token")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct ListClient {
    inner: Arc<ListClientInner>,
}

struct ListClientInner {
    base_url: Url,
    bearer_token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ListClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ListClientBuilder<Missing> {
        ListClientBuilder::new()
    }

    /// Returns the base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolves an endpoint path against the base URL and appends `params`.
    pub fn endpoint_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url, Error> {
        let mut url = self.inner.base_url.join(endpoint.trim_start_matches('/'))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }
}

#[async_trait]
impl ListSource for ListClient {
    async fn fetch_list(&self, request: &ListRequest) -> Result<ListResponse, FetchError> {
        let url = self
            .endpoint_url(&request.endpoint, &request.params)
            .map_err(|e| FetchError::network(e.to_string()))?;

        log::debug!("GET {}", url);

        let mut builder = self
            .inner
            .http_client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.inner.bearer_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::server(status.as_u16(), body));
        }

        ListResponse::from_json(&body, &request.id_field)
    }

    fn list_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url, Error> {
        self.endpoint_url(endpoint, params)
    }
}

impl std::fmt::Debug for ListClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.bearer_token.is_some())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ListClient`].
///
/// Uses the typestate pattern so `build` is only available once the base
/// URL has been set.
pub struct ListClientBuilder<U> {
    url: U,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HeaderMap,
    http_client: Option<Client>,
}

impl ListClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            bearer_token: None,
            timeout: None,
            connect_timeout: None,
            headers: HeaderMap::new(),
            http_client: None,
        }
    }

    /// Sets the API base URL.
    ///
    /// Endpoint paths are resolved relative to it; a missing trailing slash
    /// is added.
    pub fn url(self, url: impl Into<String>) -> ListClientBuilder<Set<String>> {
        ListClientBuilder {
            url: Set(url.into()),
            bearer_token: self.bearer_token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            headers: self.headers,
            http_client: self.http_client,
        }
    }
}

impl Default for ListClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ListClientBuilder<U> {
    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Adds a default header sent with every request.
    ///
    /// Applied when building the HTTP client; ignored with a custom client.
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ListClientBuilder<Set<String>> {
    /// Builds the [`ListClient`].
    pub fn build(self) -> Result<ListClient, Error> {
        let mut raw = self.url.0;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot be a base URL", raw)));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder().default_headers(self.headers);
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(ListClient {
            inner: Arc::new(ListClientInner {
                base_url,
                bearer_token: self.bearer_token,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
