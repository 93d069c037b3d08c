//! Backend Access
//!
//! The loader reads the backend through the [`Backend`] trait: one
//! authenticated GET per call, returning the raw status and body. Deciding
//! what a status means is the loader's job, not the transport's.
//!
//! - [`HttpBackend`]: reqwest transport for native hosts
//! - The browser host implements [`Backend`] over gloo-net

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::AuthToken;

/// Status and body of a settled request
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx, the same test `fetch` uses for `Response.ok`
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(FetchError::from)
    }
}

/// Read access to the backend API
///
/// Futures need not be `Send`; both loader operations run on one task.
#[async_trait(?Send)]
pub trait Backend {
    /// Issue `GET path`, attaching `Authorization: Bearer <token>` when a
    /// token is given
    async fn get(&self, path: &str, token: Option<&AuthToken>) -> Result<RawResponse, FetchError>;
}

#[async_trait(?Send)]
impl<B: Backend + ?Sized> Backend for &B {
    async fn get(&self, path: &str, token: Option<&AuthToken>) -> Result<RawResponse, FetchError> {
        (**self).get(path, token).await
    }
}

/// Failures that leave a container untouched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Backend could not be reached
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Request failed in flight
    #[error("Request failed: {0}")]
    Transport(String),

    /// OK response whose body is not the expected shape
    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
