//! Page Data Loader
//!
//! Fetches the current user's assignment and tips and renders them into the
//! page. Runs once per page load:
//!
//! 1. Look up each container; an absent container skips its operation
//! 2. Issue one authenticated GET per present container, both in flight
//!    together on the current task
//! 3. When a request settles, render its container:
//!    - OK status: the decoded data
//!    - any other status: a fixed fallback message
//!    - transport or decode failure: nothing, the failure is logged
//!
//! No retries, no timeouts, no cancellation.

use futures_util::future::{join, OptionFuture};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{Backend, FetchError};
use crate::model::{Assignment, AuthToken, Tip};
use crate::page::{Container, Page};
use crate::storage::{read_token, KeyValueStore, StorageResult};
use crate::view::View;

/// Default path of the assignment resource
pub const ASSIGNMENT_PATH: &str = "/users/assignment";

/// Default path of the tips resource
pub const TIPS_PATH: &str = "/tips/me";

/// Default id of the assignment container
pub const ASSIGNMENT_CONTAINER: &str = "assignment-container";

/// Default id of the tips container
pub const TIPS_CONTAINER: &str = "tips-container";

/// Backend resource paths
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub assignment: String,
    pub tips: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            assignment: ASSIGNMENT_PATH.to_string(),
            tips: TIPS_PATH.to_string(),
        }
    }
}

/// Page container ids
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerIds {
    pub assignment: String,
    pub tips: String,
}

impl Default for ContainerIds {
    fn default() -> Self {
        Self {
            assignment: ASSIGNMENT_CONTAINER.to_string(),
            tips: TIPS_CONTAINER.to_string(),
        }
    }
}

/// How one operation settled
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Container shows the fetched data
    Rendered,
    /// Backend answered with a non-OK status; container shows the fallback
    Fallback { status: u16 },
    /// Transport or decode failure; container left as it was
    Failed { error: String },
    /// Container absent; no request was made
    Skipped,
}

impl Outcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Outcome::Rendered)
    }
}

/// Outcomes of one page load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub assignment: Outcome,
    pub tips: Outcome,
}

impl LoadReport {
    /// Operations that failed without touching their container
    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [("assignment", &self.assignment), ("tips", &self.tips)]
            .into_iter()
            .filter_map(|(name, outcome)| match outcome {
                Outcome::Failed { error } => Some((name, error.as_str())),
                _ => None,
            })
    }
}

/// Result of a request that reached the backend
enum Fetched<T> {
    Data(T),
    Status(u16),
}

/// Fetch-and-render for the assignment and tips containers
pub struct PageDataLoader<B> {
    backend: B,
    token: Option<AuthToken>,
    endpoints: Endpoints,
    containers: ContainerIds,
}

impl<B: Backend> PageDataLoader<B> {
    /// Create a loader that authenticates every request with `token`.
    ///
    /// Without a token the requests go out unauthenticated and the backend
    /// decides what to answer.
    pub fn new(backend: B, token: Option<AuthToken>) -> Self {
        if token.is_none() {
            tracing::warn!("No auth token available, requests will be unauthenticated");
        }

        Self {
            backend,
            token,
            endpoints: Endpoints::default(),
            containers: ContainerIds::default(),
        }
    }

    /// Create a loader with the token stored under `key`.
    ///
    /// Fails when the store cannot be read; the page is then left alone
    /// instead of loading without credentials.
    pub fn from_store<S: KeyValueStore + ?Sized>(
        backend: B,
        store: &S,
        key: &str,
    ) -> StorageResult<Self> {
        let token = read_token(store, key)?;
        Ok(Self::new(backend, token))
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_containers(mut self, containers: ContainerIds) -> Self {
        self.containers = containers;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn containers(&self) -> &ContainerIds {
        &self.containers
    }

    /// Page-ready entry point. Runs both operations concurrently and returns
    /// once both have settled.
    pub async fn on_ready<P: Page>(&self, page: &P) -> LoadReport {
        let assignment: OptionFuture<_> = page
            .container(&self.containers.assignment)
            .map(|container| async move { self.load_assignment(&container).await })
            .into();
        let tips: OptionFuture<_> = page
            .container(&self.containers.tips)
            .map(|container| async move { self.load_tips(&container).await })
            .into();

        let (assignment, tips) = join(assignment, tips).await;

        LoadReport {
            assignment: assignment.unwrap_or_else(|| self.skipped(&self.containers.assignment)),
            tips: tips.unwrap_or_else(|| self.skipped(&self.containers.tips)),
        }
    }

    /// Operation A: fetch the assignment and render it into `container`
    pub async fn load_assignment<C: Container>(&self, container: &C) -> Outcome {
        let path = &self.endpoints.assignment;
        let settled = self.fetch::<Assignment>(path).await;
        settle(container, path, settled, |assignment| View::assignment(&assignment), View::no_assignment)
    }

    /// Operation B: fetch the tips and render them into `container`
    pub async fn load_tips<C: Container>(&self, container: &C) -> Outcome {
        let path = &self.endpoints.tips;
        let settled = self.fetch::<Vec<Tip>>(path).await;
        settle(container, path, settled, |tips| View::tips(&tips), View::no_tips)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Fetched<T>, FetchError> {
        let response = self.backend.get(path, self.token.as_ref()).await?;

        if !response.is_ok() {
            return Ok(Fetched::Status(response.status));
        }

        response.json().map(Fetched::Data)
    }

    fn skipped(&self, container_id: &str) -> Outcome {
        tracing::debug!(container = container_id, "Container absent, skipping");
        Outcome::Skipped
    }
}

/// Map a settled request to its effect on the container.
///
/// The error branch is log-only: the user sees no change.
fn settle<T, C: Container>(
    container: &C,
    path: &str,
    settled: Result<Fetched<T>, FetchError>,
    present: impl FnOnce(T) -> View,
    fallback: impl FnOnce() -> View,
) -> Outcome {
    match settled {
        Ok(Fetched::Data(data)) => {
            container.render(&present(data));
            Outcome::Rendered
        }
        Ok(Fetched::Status(status)) => {
            tracing::warn!(path, status, "Non-OK response, rendering fallback");
            container.render(&fallback());
            Outcome::Fallback { status }
        }
        Err(error) => {
            tracing::error!(path, error = %error, "Fetch failed, container left unchanged");
            Outcome::Failed {
                error: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawResponse;
    use crate::page::Document;
    use crate::storage::{MemoryStore, StorageError, TOKEN_KEY};
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Backend answering from a fixed table and recording every call
    #[derive(Default)]
    struct TableBackend {
        responses: HashMap<String, Result<RawResponse, FetchError>>,
        calls: RefCell<Vec<(String, Option<String>)>>,
    }

    impl TableBackend {
        fn respond(mut self, path: &str, status: u16, body: &str) -> Self {
            self.responses
                .insert(path.to_string(), Ok(RawResponse::new(status, body)));
            self
        }

        fn fail(mut self, path: &str, error: FetchError) -> Self {
            self.responses.insert(path.to_string(), Err(error));
            self
        }

        fn called_paths(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(path, _)| path.clone()).collect()
        }
    }

    #[async_trait(?Send)]
    impl Backend for TableBackend {
        async fn get(
            &self,
            path: &str,
            token: Option<&AuthToken>,
        ) -> Result<RawResponse, FetchError> {
            self.calls
                .borrow_mut()
                .push((path.to_string(), token.map(|t| t.bearer_header())));
            self.responses
                .get(path)
                .cloned()
                .unwrap_or_else(|| Ok(RawResponse::new(404, "")))
        }
    }

    /// Store whose every read fails, like a blocked `localStorage`
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("access denied".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("access denied".to_string()))
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("access denied".to_string()))
        }
    }

    fn both_containers() -> Document {
        Document::with_containers([ASSIGNMENT_CONTAINER, TIPS_CONTAINER])
    }

    #[tokio::test]
    async fn test_both_ok() {
        let backend = TableBackend::default()
            .respond(ASSIGNMENT_PATH, 200, r#"{"assigned_user_id": 17}"#)
            .respond(TIPS_PATH, 200, r#"[{"content": "wool socks"}, {"content": "dark chocolate"}]"#);
        let loader = PageDataLoader::new(&backend, Some(AuthToken::new("abc")));
        let page = both_containers();

        let report = loader.on_ready(&page).await;

        assert_eq!(report.assignment, Outcome::Rendered);
        assert_eq!(report.tips, Outcome::Rendered);
        assert_eq!(
            page.inner_html(ASSIGNMENT_CONTAINER).unwrap(),
            "<p>You are assigned to buy a gift for: 17</p>"
        );
        assert_eq!(
            page.inner_html(TIPS_CONTAINER).unwrap(),
            "<ul><li>wool socks</li><li>dark chocolate</li></ul>"
        );
    }

    #[tokio::test]
    async fn test_bearer_header_on_every_request() {
        let backend = TableBackend::default();
        let loader = PageDataLoader::new(&backend, Some(AuthToken::new("tok-123")));

        loader.on_ready(&both_containers()).await;

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls
            .iter()
            .all(|(_, header)| header.as_deref() == Some("Bearer tok-123")));
    }

    #[tokio::test]
    async fn test_non_ok_assignment_renders_fallback() {
        let backend = TableBackend::default()
            .respond(ASSIGNMENT_PATH, 404, r#"{"detail": "Not found"}"#)
            .respond(TIPS_PATH, 200, r#"[{"content": "books"}]"#);
        let loader = PageDataLoader::new(&backend, Some(AuthToken::new("abc")));
        let page = both_containers();

        let report = loader.on_ready(&page).await;

        assert_eq!(report.assignment, Outcome::Fallback { status: 404 });
        assert_eq!(
            page.inner_html(ASSIGNMENT_CONTAINER).unwrap(),
            "<p>No assignment found.</p>"
        );
        assert!(report.tips.is_rendered());
    }

    #[tokio::test]
    async fn test_unauthorized_and_server_error_share_fallback() {
        let backend = TableBackend::default()
            .respond(ASSIGNMENT_PATH, 401, "")
            .respond(TIPS_PATH, 500, "");
        let loader = PageDataLoader::new(&backend, None);
        let page = both_containers();

        let report = loader.on_ready(&page).await;

        assert_eq!(report.assignment, Outcome::Fallback { status: 401 });
        assert_eq!(report.tips, Outcome::Fallback { status: 500 });
        assert_eq!(page.inner_html(TIPS_CONTAINER).unwrap(), "<p>No tips found.</p>");
    }

    #[tokio::test]
    async fn test_empty_tips_is_an_empty_list() {
        let backend = TableBackend::default().respond(TIPS_PATH, 200, "[]");
        let loader = PageDataLoader::new(&backend, Some(AuthToken::new("abc")));
        let page = Document::with_containers([TIPS_CONTAINER]);

        let report = loader.on_ready(&page).await;

        assert_eq!(report.tips, Outcome::Rendered);
        assert_eq!(page.inner_html(TIPS_CONTAINER).unwrap(), "<ul></ul>");
    }

    #[tokio::test]
    async fn test_absent_container_makes_no_request() {
        let backend = TableBackend::default().respond(TIPS_PATH, 200, "[]");
        let loader = PageDataLoader::new(&backend, Some(AuthToken::new("abc")));
        let page = Document::with_containers([TIPS_CONTAINER]);

        let report = loader.on_ready(&page).await;

        assert_eq!(report.assignment, Outcome::Skipped);
        assert_eq!(backend.called_paths(), vec![TIPS_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_transport_error_leaves_container_unchanged() {
        let backend = TableBackend::default()
            .fail(
                ASSIGNMENT_PATH,
                FetchError::Unavailable("connection refused".to_string()),
            )
            .respond(TIPS_PATH, 200, "not json");
        let loader = PageDataLoader::new(&backend, Some(AuthToken::new("abc")));
        let mut page = Document::new();
        page.add_container(ASSIGNMENT_CONTAINER, "<em>before</em>");
        page.add_container(TIPS_CONTAINER, "");

        let report = loader.on_ready(&page).await;

        assert!(matches!(report.assignment, Outcome::Failed { .. }));
        assert!(matches!(report.tips, Outcome::Failed { .. }));
        assert_eq!(page.inner_html(ASSIGNMENT_CONTAINER).unwrap(), "<em>before</em>");
        assert_eq!(page.inner_html(TIPS_CONTAINER).unwrap(), "");
        assert_eq!(report.failures().count(), 2);
    }

    #[tokio::test]
    async fn test_custom_endpoints_and_containers() {
        let backend = TableBackend::default().respond("/api/tips", 200, r#"[{"content": "x"}]"#);
        let loader = PageDataLoader::new(&backend, None)
            .with_endpoints(Endpoints {
                assignment: "/api/assignment".to_string(),
                tips: "/api/tips".to_string(),
            })
            .with_containers(ContainerIds {
                assignment: "gift".to_string(),
                tips: "hints".to_string(),
            });
        let page = Document::with_containers(["hints"]);

        let report = loader.on_ready(&page).await;

        assert_eq!(report.assignment, Outcome::Skipped);
        assert_eq!(report.tips, Outcome::Rendered);
        assert_eq!(backend.called_paths(), vec!["/api/tips".to_string()]);
    }

    #[test]
    fn test_report_json() {
        let report = LoadReport {
            assignment: Outcome::Fallback { status: 404 },
            tips: Outcome::Skipped,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["assignment"]["outcome"], "fallback");
        assert_eq!(json["assignment"]["status"], 404);
        assert_eq!(json["tips"]["outcome"], "skipped");
    }

    #[tokio::test]
    async fn test_from_store_sends_stored_token() {
        let store = MemoryStore::new();
        store.set_item(TOKEN_KEY, "stored-tok").unwrap();
        let backend = TableBackend::default();

        let loader = PageDataLoader::from_store(&backend, &store, TOKEN_KEY).unwrap();
        loader.on_ready(&both_containers()).await;

        assert!(backend
            .calls
            .borrow()
            .iter()
            .all(|(_, header)| header.as_deref() == Some("Bearer stored-tok")));
    }

    #[test]
    fn test_unreadable_store_yields_no_loader() {
        let backend = TableBackend::default();

        let result = PageDataLoader::from_store(&backend, &BrokenStore, TOKEN_KEY);

        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert!(backend.called_paths().is_empty());
    }
}
