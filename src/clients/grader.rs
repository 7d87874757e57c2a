//! Grading-backend client seeded from a submission URL.

use crate::clients::api_client::{ApiClient, PostBody};
use crate::clients::response::ApiResponse;
use crate::config::ClientConfig;
use crate::error::{ApiError, UrlError};
use crate::resource::Resource;
use crate::urls;

/// A client bound to one submission URL.
///
/// The submission URL may carry credentials as a query string. Those are
/// split off into the client's default request parameters so that the
/// cache key stays the bare grading URL: the same resource cached without
/// credentials can be reused across differently-authenticated requests.
///
/// # Example
///
/// ```rust,ignore
/// use lazylink::{ClientConfig, GraderClient};
/// use serde_json::Value;
///
/// let mut grader = GraderClient::new(
///     "https://api.example/api/v2/submissions/42/?token=abc",
///     ClientConfig::default(),
/// )?;
/// let data = grader.grading_data().await?;
/// let exercise = data.get("exercise").await?;
/// grader.grade(vec![
///     ("points".to_string(), "10".to_string()),
///     ("max_points".to_string(), "10".to_string()),
/// ]).await?;
/// ```
#[derive(Clone, Debug)]
pub struct GraderClient {
    client: ApiClient,
    grading_url: String,
    grading_data: Option<Resource>,
}

impl GraderClient {
    /// Creates a grader client from a submission URL.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if the submission URL cannot be normalized.
    pub fn new(submission_url: &str, config: ClientConfig) -> Result<Self, UrlError> {
        Self::from_client(ApiClient::new(config), submission_url)
    }

    /// Binds an existing client to a submission URL.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if the submission URL cannot be normalized.
    pub fn from_client(client: ApiClient, submission_url: &str) -> Result<Self, UrlError> {
        let (grading_url, params) = urls::normalize(submission_url)?;
        client.update_params(params);
        Ok(Self {
            client,
            grading_url,
            grading_data: None,
        })
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The submission URL with credentials stripped.
    #[must_use]
    pub fn grading_url(&self) -> &str {
        &self.grading_url
    }

    /// The submission resource, fetched lazily on first access and held
    /// for the lifetime of this client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first fetch fails.
    pub async fn grading_data(&mut self) -> Result<&mut Resource, ApiError> {
        let resource = match self.grading_data.take() {
            Some(resource) => resource,
            None => self.client.load_data(&self.grading_url).await?,
        };
        Ok(self.grading_data.insert(resource))
    }

    /// POSTs a form-encoded grading result to the grading URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] only for URL-resolution failures; transport
    /// failures surface as a synthesized 504 response.
    pub async fn grade(&self, fields: Vec<(String, String)>) -> Result<ApiResponse, ApiError> {
        self.client.do_post(&self.grading_url, PostBody::Form(fields)).await
    }
}
