//! reqwest Backend
//!
//! HTTP transport for native hosts. No timeout and no retries: every call
//! settles exactly once, however long the backend takes.

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, FetchError, RawResponse};
use crate::model::AuthToken;

/// Backend API reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url` (e.g. "http://localhost:8000")
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("secret-snake/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a backend that reuses an existing client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn get(&self, path: &str, token: Option<&AuthToken>) -> Result<RawResponse, FetchError> {
        let url = self.url(path);
        tracing::debug!(url = %url, authenticated = token.is_some(), "GET");

        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await.map_err(map_request_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_request_error)?;

        tracing::debug!(url = %url, status, bytes = body.len(), "Response received");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

fn map_request_error(e: reqwest::Error) -> FetchError {
    if e.is_connect() {
        FetchError::Unavailable(e.to_string())
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}
