//! Resource wrappers over raw JSON values.
//!
//! This is the data model of the crate: a closed family of variants that
//! wrap raw JSON and expose graph-navigation semantics. Which variant
//! wraps a given value is decided once, at wrap time, by a total
//! classification rule:
//!
//! 1. an object with exactly the keys `count`, `next`, `previous`,
//!    `results` (with `results` an array), arriving from a real fetch,
//!    is a [`PaginatedResource`];
//! 2. an object with exactly one key `detail` holding a string is an
//!    [`ErrorResource`];
//! 3. any other object is an [`ObjectResource`];
//! 4. an array is a [`ListResource`];
//! 5. everything else (string, number, boolean, null) passes through as
//!    an unwrapped scalar.
//!
//! Field access on an [`ObjectResource`] is where laziness lives: a miss
//! triggers a full load of the object's own canonical URL, and a string
//! value that looks like a link into the same API is resolved into a
//! fresh resource through the owning client.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::clients::ApiClient;
use crate::error::ApiError;

const PAGINATION_KEYS: [&str; 4] = ["count", "next", "previous", "results"];

/// A wrapped JSON value tied to the client it was loaded through.
///
/// Cloning is cheap for the client back-reference (shared handle) but
/// deep for the held JSON data.
#[derive(Clone, Debug)]
pub enum Resource {
    /// A JSON object exposing lazy field access.
    Object(ObjectResource),
    /// A JSON array of individually wrapped elements.
    List(ListResource),
    /// A paginated collection following `next`/`previous` links.
    Paginated(PaginatedResource),
    /// An application-level error payload.
    Error(ErrorResource),
    /// Any other JSON value, passed through unchanged.
    Scalar(Value),
}

enum Shape {
    Paginated,
    Error,
    Object,
    List,
    Scalar,
}

/// The single classification rule; applied exactly once per raw value.
fn classify(value: &Value, has_source_url: bool) -> Shape {
    match value {
        Value::Object(map) => {
            if has_source_url
                && map.len() == PAGINATION_KEYS.len()
                && PAGINATION_KEYS.iter().all(|key| map.contains_key(*key))
                && map.get("results").is_some_and(Value::is_array)
            {
                Shape::Paginated
            } else if map.len() == 1 && map.get("detail").is_some_and(Value::is_string) {
                Shape::Error
            } else {
                Shape::Object
            }
        }
        Value::Array(_) => Shape::List,
        _ => Shape::Scalar,
    }
}

impl Resource {
    /// Wraps a freshly fetched top-level value.
    ///
    /// Only here can a value classify as paginated, and seeding the first
    /// page (walking `previous` links) is the one asynchronous step of
    /// wrapping.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if walking back to the first page of a
    /// paginated collection fails.
    pub async fn wrap(
        client: ApiClient,
        value: Value,
        source_url: Option<String>,
    ) -> Result<Self, ApiError> {
        match classify(&value, source_url.is_some()) {
            Shape::Paginated => Ok(Self::Paginated(
                PaginatedResource::seek_first_page(client, value, source_url).await?,
            )),
            Shape::Object => match value {
                Value::Object(map) => {
                    Ok(Self::Object(ObjectResource::new(client, map, source_url)))
                }
                _ => Ok(Self::Scalar(value)),
            },
            _ => Ok(Self::wrap_nested(client, value)),
        }
    }

    /// Wraps a value embedded inside a parent payload.
    ///
    /// Embedded values carry no source URL and therefore never classify
    /// as paginated.
    pub(crate) fn wrap_nested(client: ApiClient, value: Value) -> Self {
        match classify(&value, false) {
            Shape::Error => match value {
                Value::Object(map) => Self::Error(ErrorResource::from_map(&map)),
                _ => Self::Scalar(value),
            },
            Shape::Object => match value {
                Value::Object(map) => Self::Object(ObjectResource::new(client, map, None)),
                _ => Self::Scalar(value),
            },
            Shape::List => match value {
                Value::Array(values) => Self::List(ListResource::new(client, values)),
                _ => Self::Scalar(value),
            },
            Shape::Paginated | Shape::Scalar => Self::Scalar(value),
        }
    }

    /// A short name for the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::List(_) => "list",
            Self::Paginated(_) => "paginated list",
            Self::Error(_) => "error",
            Self::Scalar(_) => "scalar",
        }
    }

    /// Field access, delegated to the object variant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotAnObject`] for non-object variants and
    /// whatever [`ObjectResource::get`] returns otherwise.
    pub async fn get(&mut self, key: &str) -> Result<Self, ApiError> {
        match self {
            Self::Object(object) => object.get(key).await,
            other => Err(ApiError::NotAnObject { kind: other.kind() }),
        }
    }

    /// Returns the object variant, if this is one.
    #[must_use]
    pub fn as_object(&mut self) -> Option<&mut ObjectResource> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the list variant, if this is one.
    #[must_use]
    pub const fn as_list(&self) -> Option<&ListResource> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the paginated variant, if this is one.
    #[must_use]
    pub fn as_paginated(&mut self) -> Option<&mut PaginatedResource> {
        match self {
            Self::Paginated(pages) => Some(pages),
            _ => None,
        }
    }

    /// Returns the error variant, if this is one.
    #[must_use]
    pub const fn as_error(&self) -> Option<&ErrorResource> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the scalar string value, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    /// Returns the scalar integer value, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    /// Returns the scalar boolean value, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Returns `true` for the null scalar (e.g. a 404 load).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }
}

/// A JSON object with lazy, link-following field access.
///
/// The held map starts from the raw payload and is only ever augmented:
/// when a key is missing and the object is not fully loaded, its own
/// canonical URL is fetched and the result merged in.
#[derive(Clone, Debug)]
pub struct ObjectResource {
    client: ApiClient,
    source_url: Option<String>,
    data: Map<String, Value>,
    url_prefix: Option<String>,
}

impl ObjectResource {
    pub(crate) fn new(client: ApiClient, data: Map<String, Value>, source_url: Option<String>) -> Self {
        let mut object = Self {
            client,
            source_url,
            data,
            url_prefix: None,
        };
        object.update_url_prefix();
        object
    }

    /// The URL this object was fetched from, or `None` for embedded data.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// The object's own canonical URL, as embedded in its `url` field.
    #[must_use]
    pub fn full_url(&self) -> Option<&str> {
        self.data.get("url").and_then(Value::as_str)
    }

    /// The prefix a string field value must carry to count as a link into
    /// the same API. Derived from the source URL (or the embedded `url`
    /// field) by keeping its first four `/`-delimited components.
    ///
    /// This is deliberately a coarse string-prefix heuristic, not an
    /// origin check.
    #[must_use]
    pub fn url_prefix(&self) -> Option<&str> {
        self.url_prefix.as_deref()
    }

    fn update_url_prefix(&mut self) {
        let url = self
            .source_url
            .as_deref()
            .or_else(|| self.full_url())
            .map(shorten_to_prefix);
        self.url_prefix = url;
    }

    /// `true` once the URL this object was loaded from equals its own
    /// embedded `url`, meaning a further self-fetch cannot add fields.
    #[must_use]
    pub fn is_all_loaded(&self) -> bool {
        self.source_url.is_some() && self.source_url.as_deref() == self.full_url()
    }

    /// Fetches the object's canonical URL and merges the result into the
    /// held map. Returns `true` if new data was merged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the fetch fails with a fatal status.
    pub async fn load_all(&mut self) -> Result<bool, ApiError> {
        let Some(full_url) = self.full_url().map(str::to_owned) else {
            return Ok(false);
        };
        if self.source_url.as_deref() == Some(full_url.as_str()) {
            return Ok(false);
        }
        match self.client.load_value(&full_url, false).await? {
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    self.data.insert(key, value);
                }
                self.source_url = Some(full_url);
                self.update_url_prefix();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Raw key lookup: no link resolution, but a miss on a partially
    /// loaded object still triggers one full load and a retry.
    ///
    /// Most callers want [`ObjectResource::get`] instead.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::KeyNotFound`] if the key is absent after the
    /// retry, or a fetch error from the full load.
    pub async fn get_item(&mut self, key: &str) -> Result<Value, ApiError> {
        match self.lookup(key).await? {
            Some(value) => Ok(value),
            None => Err(ApiError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    async fn lookup(&mut self, key: &str) -> Result<Option<Value>, ApiError> {
        if let Some(value) = self.data.get(key) {
            return Ok(Some(value.clone()));
        }
        if self.load_all().await? {
            return Ok(self.data.get(key).cloned());
        }
        Ok(None)
    }

    /// Field access with link resolution.
    ///
    /// A found string value that starts with this object's
    /// [`url_prefix`](Self::url_prefix) (and is not the `url` field
    /// itself) is loaded through the client and returned as a resource.
    /// If that resolution fails the failure is logged and the raw string
    /// is returned instead; one unreachable linked resource must not halt
    /// a traversal.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::KeyNotFound`] if the key is absent even after
    /// a full load, or a fetch error from that load.
    pub async fn get(&mut self, key: &str) -> Result<Resource, ApiError> {
        let value = self.get_item(key).await?;
        Ok(self.resolve(key, value).await)
    }

    /// Like [`ObjectResource::get`] but returning a wrapped `default`
    /// when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the full-load attempt fails fatally.
    pub async fn get_or(&mut self, key: &str, default: Value) -> Result<Resource, ApiError> {
        let value = self.lookup(key).await?.unwrap_or(default);
        Ok(self.resolve(key, value).await)
    }

    async fn resolve(&mut self, key: &str, value: Value) -> Resource {
        if key != "url" {
            if let Value::String(link) = &value {
                let is_api_link = self
                    .url_prefix
                    .as_deref()
                    .is_some_and(|prefix| link.starts_with(prefix));
                if is_api_link {
                    match self.client.load_data(link).await {
                        Ok(resource) => return resource,
                        Err(err) => {
                            tracing::error!(url = %link, %err, "could not load linked resource");
                        }
                    }
                }
            }
        }
        Resource::wrap_nested(self.client.clone(), value)
    }

    /// Returns `true` if the key is present, fetching the full object if
    /// needed to decide.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the full-load attempt fails fatally.
    pub async fn contains_key(&mut self, key: &str) -> Result<bool, ApiError> {
        Ok(self.lookup(key).await?.is_some())
    }

    /// The keys currently held, without triggering any fetch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

/// Keeps the first four `/`-delimited components of a URL:
/// `http://host/api/v2/x/` shortens to `http://host/api`.
fn shorten_to_prefix(url: &str) -> String {
    url.splitn(5, '/').take(4).collect::<Vec<_>>().join("/")
}

/// A JSON array whose elements are individually wrapped.
#[derive(Clone, Debug)]
pub struct ListResource {
    items: Vec<Resource>,
}

impl ListResource {
    pub(crate) fn new(client: ApiClient, values: Vec<Value>) -> Self {
        let items = values
            .into_iter()
            .map(|value| Resource::wrap_nested(client.clone(), value))
            .collect();
        Self { items }
    }

    /// Number of elements held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`, if in bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Resource> {
        self.items.get(index)
    }

    /// Iterates over the held elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a ListResource {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for ListResource {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// A paginated collection in the `{count, next, previous, results}`
/// envelope.
///
/// Construction first walks `previous` links back to the first page, so
/// iteration always starts from the beginning even when the API handed
/// out an arbitrary page. Fetched pages accumulate for the lifetime of
/// the value; they are never discarded.
#[derive(Clone, Debug)]
pub struct PaginatedResource {
    client: ApiClient,
    source_url: Option<String>,
    items: Vec<Resource>,
    count: u64,
    next: Option<String>,
}

impl PaginatedResource {
    async fn seek_first_page(
        client: ApiClient,
        data: Value,
        source_url: Option<String>,
    ) -> Result<Self, ApiError> {
        let mut page = data;
        // Cache-first fetches make the backward walk cheap; the visited
        // set guards against a cyclic previous-chain.
        let mut visited: HashSet<String> = HashSet::new();
        while let Some(previous) = page
            .get("previous")
            .and_then(Value::as_str)
            .map(str::to_owned)
        {
            if !visited.insert(previous.clone()) {
                break;
            }
            match client.load_value(&previous, false).await? {
                Some(value) => page = value,
                None => break,
            }
        }

        let mut pages = Self {
            client,
            source_url,
            items: Vec::new(),
            count: 0,
            next: None,
        };
        pages.absorb_page(page);
        Ok(pages)
    }

    fn absorb_page(&mut self, page: Value) {
        let Value::Object(mut map) = page else {
            return;
        };
        if let Some(count) = map.get("count").and_then(Value::as_u64) {
            self.count = count;
        }
        self.next = map
            .get("next")
            .and_then(Value::as_str)
            .map(str::to_owned);
        if let Some(Value::Array(results)) = map.remove("results") {
            for value in results {
                self.items
                    .push(Resource::wrap_nested(self.client.clone(), value));
            }
        }
    }

    /// The URL this collection was fetched from.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// The *total* remote element count, independent of how many pages
    /// have been materialized locally.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// The elements materialized so far.
    #[must_use]
    pub fn loaded(&self) -> &[Resource] {
        &self.items
    }

    /// Returns `true` if a `next` page link remains to be fetched.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Fetches the next page (cache-first) and appends its results.
    /// Returns `true` if a page was fetched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the fetch fails with a fatal status.
    pub async fn load_next(&mut self) -> Result<bool, ApiError> {
        let Some(next) = self.next.clone() else {
            return Ok(false);
        };
        match self.client.load_value(&next, false).await? {
            Some(page) => {
                self.absorb_page(page);
                Ok(true)
            }
            None => {
                self.next = None;
                Ok(false)
            }
        }
    }

    /// Returns a forward cursor over all elements.
    ///
    /// The cursor yields already-materialized elements first and then
    /// fetches pages on demand until the `next` chain ends. A fresh
    /// cursor restarts from the materialized prefix without re-fetching.
    pub fn iter(&mut self) -> PageCursor<'_> {
        PageCursor {
            pages: self,
            position: 0,
        }
    }
}

/// Forward cursor over a [`PaginatedResource`].
///
/// There is no lending-iterator trait to implement here; call
/// [`PageCursor::try_next`] in a loop:
///
/// ```rust,ignore
/// let mut cursor = pages.iter();
/// while let Some(item) = cursor.try_next().await? {
///     // use item
/// }
/// ```
pub struct PageCursor<'a> {
    pages: &'a mut PaginatedResource,
    position: usize,
}

impl PageCursor<'_> {
    /// Yields the next element, fetching further pages as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page fetch fails with a fatal status.
    pub async fn try_next(&mut self) -> Result<Option<Resource>, ApiError> {
        while self.position >= self.pages.items.len() {
            if !self.pages.load_next().await? {
                return Ok(None);
            }
        }
        let item = self.pages.items[self.position].clone();
        self.position += 1;
        Ok(Some(item))
    }
}

/// An application-level error payload: exactly `{"detail": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorResource {
    detail: String,
}

impl ErrorResource {
    fn from_map(map: &Map<String, Value>) -> Self {
        let detail = map
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { detail }
    }

    /// The human-readable error message.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl std::fmt::Display for ErrorResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use serde_json::json;

    fn test_client() -> ApiClient {
        ApiClient::new(ClientConfig::default())
    }

    fn wrap_nested(value: Value) -> Resource {
        Resource::wrap_nested(test_client(), value)
    }

    #[tokio::test]
    async fn test_wrap_object() {
        let resource = Resource::wrap(test_client(), json!({"id": 1}), None)
            .await
            .unwrap();
        assert!(matches!(resource, Resource::Object(_)));
    }

    #[tokio::test]
    async fn test_wrap_list() {
        let resource = Resource::wrap(test_client(), json!([1, 2]), None)
            .await
            .unwrap();
        let list = resource.as_list().unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_wrap_scalars_pass_through() {
        for value in [json!("text"), json!(3), json!(true), Value::Null] {
            let resource = Resource::wrap(test_client(), value.clone(), None)
                .await
                .unwrap();
            assert!(matches!(resource, Resource::Scalar(v) if v == value));
        }
    }

    #[tokio::test]
    async fn test_error_shape_needs_exactly_one_string_detail() {
        let resource = wrap_nested(json!({"detail": "denied"}));
        assert_eq!(resource.as_error().unwrap().detail(), "denied");

        // A second key, or a non-string detail, makes it a plain object.
        let mut resource = wrap_nested(json!({"detail": "x", "id": 1}));
        assert!(resource.as_object().is_some());
        let mut resource = wrap_nested(json!({"detail": 5}));
        assert!(resource.as_object().is_some());
    }

    #[tokio::test]
    async fn test_pagination_shape_requires_source_url() {
        let envelope = json!({
            "count": 0, "next": null, "previous": null, "results": []
        });
        // Embedded: plain object.
        let mut resource = wrap_nested(envelope.clone());
        assert!(resource.as_object().is_some());
        // Fetched: paginated.
        let mut resource = Resource::wrap(
            test_client(),
            envelope,
            Some("http://api.example/api/v2/things/".to_string()),
        )
        .await
        .unwrap();
        assert!(resource.as_paginated().is_some());
    }

    #[tokio::test]
    async fn test_pagination_shape_requires_exact_key_set() {
        let value = json!({
            "count": 1, "next": null, "previous": null, "results": [], "extra": 1
        });
        let mut resource = Resource::wrap(
            test_client(),
            value,
            Some("http://api.example/api/v2/things/".to_string()),
        )
        .await
        .unwrap();
        assert!(resource.as_object().is_some());
    }

    #[tokio::test]
    async fn test_paginated_count_reports_remote_total() {
        let envelope = json!({
            "count": 120, "next": null, "previous": null,
            "results": [{"id": 1}, {"id": 2}]
        });
        let mut resource = Resource::wrap(
            test_client(),
            envelope,
            Some("http://api.example/api/v2/things/".to_string()),
        )
        .await
        .unwrap();
        let pages = resource.as_paginated().unwrap();
        assert_eq!(pages.count(), 120);
        assert_eq!(pages.loaded().len(), 2);
    }

    #[tokio::test]
    async fn test_list_elements_are_wrapped_recursively() {
        let resource = wrap_nested(json!([{"id": 1}, [2], "s"]));
        let list = resource.as_list().unwrap();
        assert!(matches!(list.get(0), Some(Resource::Object(_))));
        assert!(matches!(list.get(1), Some(Resource::List(_))));
        assert_eq!(list.get(2).and_then(Resource::as_str), Some("s"));
    }

    #[test]
    fn test_shorten_to_prefix() {
        assert_eq!(
            shorten_to_prefix("http://host/api/v2/exercises/3/"),
            "http://host/api"
        );
        assert_eq!(shorten_to_prefix("http://host/api"), "http://host/api");
        assert_eq!(shorten_to_prefix("http://host"), "http://host");
    }

    #[tokio::test]
    async fn test_url_prefix_prefers_source_url() {
        let mut resource = Resource::wrap(
            test_client(),
            json!({"url": "http://embedded/api/v2/x/"}),
            Some("http://fetched/api/v2/x/".to_string()),
        )
        .await
        .unwrap();
        let object = resource.as_object().unwrap();
        assert_eq!(object.url_prefix(), Some("http://fetched/api"));
    }

    #[tokio::test]
    async fn test_url_prefix_falls_back_to_embedded_url() {
        let resource = wrap_nested(json!({"url": "http://embedded/api/v2/x/"}));
        let Resource::Object(object) = resource else {
            panic!("expected object");
        };
        assert_eq!(object.url_prefix(), Some("http://embedded/api"));
    }

    #[tokio::test]
    async fn test_is_all_loaded() {
        let url = "http://api.example/api/v2/exercises/1/";
        let mut resource = Resource::wrap(
            test_client(),
            json!({"url": url}),
            Some(url.to_string()),
        )
        .await
        .unwrap();
        assert!(resource.as_object().unwrap().is_all_loaded());

        let mut partial = Resource::wrap(
            test_client(),
            json!({"url": url}),
            Some("http://api.example/api/v2/courses/1/exercises/".to_string()),
        )
        .await
        .unwrap();
        assert!(!partial.as_object().unwrap().is_all_loaded());
    }

    #[tokio::test]
    async fn test_get_returns_embedded_values_without_fetching() {
        let mut resource = wrap_nested(json!({"id": 7, "name": "x"}));
        let object = resource.as_object().unwrap();
        assert_eq!(object.get("id").await.unwrap().as_i64(), Some(7));
        assert_eq!(object.get("name").await.unwrap().as_str(), Some("x"));
    }

    #[tokio::test]
    async fn test_get_missing_key_without_url_is_key_not_found() {
        let mut resource = wrap_nested(json!({"id": 7}));
        let object = resource.as_object().unwrap();
        let err = object.get("missing").await.unwrap_err();
        assert!(matches!(err, ApiError::KeyNotFound { key } if key == "missing"));
    }

    #[tokio::test]
    async fn test_get_or_returns_default_for_missing_key() {
        let mut resource = wrap_nested(json!({"id": 7}));
        let object = resource.as_object().unwrap();
        let value = object.get_or("missing", json!(42)).await.unwrap();
        assert_eq!(value.as_i64(), Some(42));
    }

    #[tokio::test]
    async fn test_get_on_non_object_resource() {
        let mut resource = wrap_nested(json!([1]));
        let err = resource.get("x").await.unwrap_err();
        assert!(matches!(err, ApiError::NotAnObject { kind: "list" }));
    }

    #[tokio::test]
    async fn test_url_field_is_never_resolved() {
        let url = "http://api.example/api/v2/exercises/1/";
        let mut resource = Resource::wrap(
            test_client(),
            json!({"url": url}),
            Some(url.to_string()),
        )
        .await
        .unwrap();
        let object = resource.as_object().unwrap();
        let value = object.get("url").await.unwrap();
        assert_eq!(value.as_str(), Some(url));
    }

    #[tokio::test]
    async fn test_foreign_host_string_is_returned_raw() {
        let mut resource = Resource::wrap(
            test_client(),
            json!({"link": "http://other-host/x"}),
            Some("http://host/api/v2/exercises/3/".to_string()),
        )
        .await
        .unwrap();
        let object = resource.as_object().unwrap();
        let value = object.get("link").await.unwrap();
        assert_eq!(value.as_str(), Some("http://other-host/x"));
    }

    #[tokio::test]
    async fn test_contains_key_and_keys() {
        let mut resource = wrap_nested(json!({"a": 1, "b": 2}));
        let object = resource.as_object().unwrap();
        assert!(object.contains_key("a").await.unwrap());
        assert!(!object.contains_key("z").await.unwrap());
        let keys: Vec<&str> = object.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
