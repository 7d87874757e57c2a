//! The core API client.
//!
//! [`ApiClient`] orchestrates outbound requests, owns the cache and the
//! default headers/params/timeouts, and turns fetched JSON into
//! [`Resource`] wrappers. It is a cheap-clone handle over shared state so
//! that every resource can carry a back-reference to the client it was
//! loaded through.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::cache::{Cache, InMemoryCache};
use crate::clients::response::ApiResponse;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::resource::Resource;
use crate::urls;

/// A POST request body.
#[derive(Clone, Debug)]
pub enum PostBody {
    /// `application/x-www-form-urlencoded` key/value pairs.
    Form(Vec<(String, String)>),
    /// An `application/json` body.
    Json(Value),
}

/// Client for one hypermedia API origin.
///
/// Cloning the client clones a handle; all clones share the same cache,
/// default parameters and base URL. The client is `Send + Sync`; note
/// that the cache is behind a single lock, so concurrent users serialize
/// on it.
///
/// # Example
///
/// ```rust,ignore
/// use lazylink::{ApiClient, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.example/api/v2/")
///     .build()?;
/// let client = ApiClient::new(config);
///
/// let mut exercise = client.load_data("/exercises/1/").await?;
/// let name = exercise.get("name").await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    api_version: Option<String>,
    read_timeout: std::time::Duration,
    debug_enabled: bool,
    base_url: Mutex<Option<String>>,
    params: Mutex<Vec<(String, String)>>,
    headers: Mutex<HashMap<String, String>>,
    cache: Mutex<Box<dyn Cache>>,
    fixtures: Mutex<HashMap<String, Value>>,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url())
            .field("api_version", &self.inner.api_version)
            .field("debug_enabled", &self.inner.debug_enabled)
            .finish_non_exhaustive()
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ApiClient {
    /// Creates a client with a fresh in-memory cache.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created, which
    /// only happens when TLS initialization fails.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_cache(config, Box::new(InMemoryCache::new()))
    }

    /// Creates a client around an injected cache backend.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created, which
    /// only happens when TLS initialization fails.
    #[must_use]
    pub fn with_cache(config: ClientConfig, cache: Box<dyn Cache>) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(config.connect_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(ClientInner {
                http,
                api_version: config.api_version().map(str::to_owned),
                read_timeout: config.read_timeout(),
                debug_enabled: config.debug_enabled(),
                base_url: Mutex::new(config.base_url().map(str::to_owned)),
                params: Mutex::new(Vec::new()),
                headers: Mutex::new(HashMap::new()),
                cache: Mutex::new(cache),
                fixtures: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns the configured base URL, if any.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        lock(&self.inner.base_url).clone()
    }

    /// Derives and sets the base URL from any full URL on the same API
    /// (truncating to its first three path segments).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if the URL cannot be validated.
    pub fn set_base_url_from(&self, url: &str) -> Result<(), ApiError> {
        let base = urls::api_base(url)?;
        *lock(&self.inner.base_url) = Some(base);
        Ok(())
    }

    /// Merges key/value pairs into the default query parameters attached
    /// to every request. Existing keys are replaced.
    pub fn update_params(&self, params: Vec<(String, String)>) {
        let mut held = lock(&self.inner.params);
        for (key, value) in params {
            if let Some(entry) = held.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value;
            } else {
                held.push((key, value));
            }
        }
    }

    /// The default query parameters currently attached to every request.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        lock(&self.inner.params).clone()
    }

    /// Sets a default header sent with every request.
    pub fn set_default_header(&self, name: impl Into<String>, value: impl Into<String>) {
        lock(&self.inner.headers).insert(name.into(), value.into());
    }

    /// The headers sent with every request: an `Accept` header carrying
    /// the API version when configured, plus any defaults set on the
    /// client.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        let accept = self.inner.api_version.as_ref().map_or_else(
            || "application/json".to_string(),
            |version| format!("application/json; version={version}"),
        );
        let mut headers = lock(&self.inner.headers).clone();
        headers.insert("Accept".to_string(), accept);
        headers
    }

    /// Registers a debug fixture: when the client was built with
    /// `debug_enabled`, GET and POST requests for `url` short-circuit to
    /// a synthesized 200 response with this JSON body.
    pub fn stub(&self, url: impl Into<String>, value: Value) {
        lock(&self.inner.fixtures).insert(url.into(), value);
    }

    fn fixture(&self, url: &str) -> Option<Value> {
        if !self.inner.debug_enabled {
            return None;
        }
        lock(&self.inner.fixtures).get(url).cloned()
    }

    /// Resolves a path-absolute URL against the configured base; absolute
    /// URLs pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingBaseUrl`] for a relative URL when no
    /// base is configured.
    pub fn full_url(&self, url: &str) -> Result<String, ApiError> {
        if url.starts_with('/') {
            match self.base_url() {
                Some(base) => Ok(format!("{base}{url}")),
                None => Err(ApiError::MissingBaseUrl {
                    url: url.to_string(),
                }),
            }
        } else {
            Ok(url.to_string())
        }
    }

    /// Performs a GET with the client's default headers, params and read
    /// timeout.
    ///
    /// Transport failures never escape: they come back as a synthesized
    /// 504 response.
    ///
    /// # Errors
    ///
    /// Only URL-resolution failures ([`ApiError::MissingBaseUrl`]) error
    /// here; HTTP-level failures are in the returned response.
    pub async fn do_get(&self, url: &str) -> Result<ApiResponse, ApiError> {
        let url = self.full_url(url)?;
        if let Some(value) = self.fixture(&url) {
            return Ok(ApiResponse::from_fixture(&value));
        }
        let params = self.params();
        tracing::debug!(%url, "making GET");

        let mut request = self
            .inner
            .http
            .get(&url)
            .timeout(self.inner.read_timeout);
        for (name, value) in self.headers() {
            request = request.header(name, value);
        }
        if !params.is_empty() {
            request = request.query(&params);
        }

        match request.send().await {
            Ok(response) => Ok(ApiResponse::from_reqwest(response).await),
            Err(err) => Ok(ApiResponse::gateway_timeout(&url, &err)),
        }
    }

    /// Performs a POST with the client's default headers, params and read
    /// timeout. Transport failures come back as a synthesized 504.
    ///
    /// # Errors
    ///
    /// Only URL-resolution failures error here.
    pub async fn do_post(&self, url: &str, body: PostBody) -> Result<ApiResponse, ApiError> {
        let url = self.full_url(url)?;
        if let Some(value) = self.fixture(&url) {
            return Ok(ApiResponse::from_fixture(&value));
        }
        let params = self.params();
        tracing::debug!(%url, "making POST");

        let mut request = self
            .inner
            .http
            .post(&url)
            .timeout(self.inner.read_timeout);
        for (name, value) in self.headers() {
            request = request.header(name, value);
        }
        if !params.is_empty() {
            request = request.query(&params);
        }
        request = match &body {
            PostBody::Form(fields) => request.form(fields),
            PostBody::Json(value) => request.json(value),
        };

        match request.send().await {
            Ok(response) => Ok(ApiResponse::from_reqwest(response).await),
            Err(err) => Ok(ApiResponse::gateway_timeout(&url, &err)),
        }
    }

    /// Cache-first raw JSON load of an absolute URL.
    ///
    /// `Ok(None)` means confirmed "no data": a 404 (which is cached as
    /// null so it is not re-fetched within the TTL) or a malformed body
    /// (which is not cached, so the next call re-fetches).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for any non-2xx status other than
    /// 404.
    pub async fn load_value(
        &self,
        url: &str,
        skip_cache: bool,
    ) -> Result<Option<Value>, ApiError> {
        if !skip_cache {
            if let Some(cached) = lock(&self.inner.cache).get(url) {
                tracing::debug!(%url, "cache hit");
                return Ok(if cached.is_null() { None } else { Some(cached) });
            }
        }

        let response = self.do_get(url).await?;
        if !response.is_ok() {
            tracing::info!(status = response.status, %url, "non-2xx response");
            if response.status == 404 {
                lock(&self.inner.cache).set(url, Value::Null);
                return Ok(None);
            }
            return Err(ApiError::Status {
                status: response.status,
                url: url.to_string(),
            });
        }

        match response.json() {
            Some(data) => {
                lock(&self.inner.cache).set(url, data.clone());
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Loads a URL (cache-first) and wraps the result as a [`Resource`].
    ///
    /// A relative URL is resolved against the configured base. "No data"
    /// (404, malformed body) wraps as the null scalar, distinct from an
    /// error-shaped payload which wraps as an error resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for URL-resolution failures and fatal HTTP
    /// statuses.
    pub async fn load_data(&self, url: &str) -> Result<Resource, ApiError> {
        self.load_data_inner(url, false).await
    }

    /// Like [`ApiClient::load_data`] but bypassing the cache for the
    /// initial fetch. The fresh value still replaces the cached one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for URL-resolution failures and fatal HTTP
    /// statuses.
    pub async fn reload_data(&self, url: &str) -> Result<Resource, ApiError> {
        self.load_data_inner(url, true).await
    }

    async fn load_data_inner(&self, url: &str, skip_cache: bool) -> Result<Resource, ApiError> {
        let url = self.full_url(url)?;
        let data = self
            .load_value(&url, skip_cache)
            .await?
            .unwrap_or(Value::Null);
        Resource::wrap(self.clone(), data, Some(url)).await
    }

    /// Idempotent download of a binary resource: if `destination` already
    /// exists nothing is fetched. A `Content-Disposition` attachment
    /// filename renames the downloaded file within the same directory.
    ///
    /// Returns the final path, or `None` on a non-2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the file cannot be written, plus
    /// URL-resolution failures.
    pub async fn load_file(
        &self,
        destination: &Path,
        url: &str,
    ) -> Result<Option<PathBuf>, ApiError> {
        if destination.is_file() {
            return Ok(Some(destination.to_path_buf()));
        }
        let response = self.do_get(url).await?;
        if !response.is_ok() {
            return Ok(None);
        }
        std::fs::write(destination, &response.body)?;

        let mut path = destination.to_path_buf();
        if let Some(name) = response.header("content-disposition").and_then(attachment_filename) {
            let renamed = destination.with_file_name(name);
            std::fs::rename(destination, &renamed)?;
            path = renamed;
        }
        Ok(Some(path))
    }
}

/// Extracts the filename from an `attachment`-type Content-Disposition
/// header value.
fn attachment_filename(header: &str) -> Option<String> {
    let mut parts = header.split(';');
    if !parts.next()?.trim().eq_ignore_ascii_case("attachment") {
        return None;
    }
    for part in parts {
        if let Some((name, value)) = part.trim().split_once('=') {
            if name.trim().eq_ignore_ascii_case("filename") {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
