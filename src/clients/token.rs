//! Token-authenticated client.

use crate::clients::api_client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::resource::Resource;

/// An [`ApiClient`] that sends a `Authorization: Token <token>` header
/// with every request. Everything else is the base client unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use lazylink::{ClientConfig, TokenClient};
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.example/api/v2/")
///     .build()?;
/// let client = TokenClient::new("secret-token", config);
/// let me = client.load_data("/users/me/").await?;
/// ```
#[derive(Clone, Debug)]
pub struct TokenClient {
    client: ApiClient,
}

impl TokenClient {
    /// Creates a token-authenticated client.
    #[must_use]
    pub fn new(token: &str, config: ClientConfig) -> Self {
        Self::from_client(ApiClient::new(config), token)
    }

    /// Adds token authentication to an existing client (for example one
    /// built around an injected cache backend).
    #[must_use]
    pub fn from_client(client: ApiClient, token: &str) -> Self {
        client.set_default_header("Authorization", format!("Token {token}"));
        Self { client }
    }

    /// The underlying client, for operations not mirrored here.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Loads a URL and wraps the result. See [`ApiClient::load_data`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for URL-resolution failures and fatal HTTP
    /// statuses.
    pub async fn load_data(&self, url: &str) -> Result<Resource, ApiError> {
        self.client.load_data(url).await
    }
}
