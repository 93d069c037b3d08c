//! HTTP API Client
//!
//! [`Backend`] implementation over gloo-net (`fetch`).

use async_trait::async_trait;
use gloo_net::http::Request;
use secret_snake::{AuthToken, Backend, FetchError, RawResponse};

/// Default API base URL: same origin as the page
pub const DEFAULT_API_BASE: &str = "";

/// Local storage key that overrides the API base URL
pub const API_BASE_KEY: &str = "secret_snake_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Backend reached with the browser's `fetch`
pub struct GlooBackend {
    api_base: String,
}

impl GlooBackend {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

#[async_trait(?Send)]
impl Backend for GlooBackend {
    async fn get(&self, path: &str, token: Option<&AuthToken>) -> Result<RawResponse, FetchError> {
        let mut request = Request::get(&format!("{}{}", self.api_base, path));
        if let Some(token) = token {
            request = request.header("Authorization", &token.bearer_header());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("Network error: {}", e)))?;

        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| FetchError::Transport(format!("Body read error: {}", e)))?;

        Ok(RawResponse::new(status, body))
    }
}
