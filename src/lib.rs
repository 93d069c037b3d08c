//! # Secret Snake
//!
//! Page loader for the Secret Snake gift exchange. On page load it fetches
//! the signed-in user's assignment and tips from the backend and renders
//! them into two page containers.
//!
//! ## Modules
//!
//! - [`model`]: Wire types and the bearer credential
//! - [`view`]: What a container shows, and its escaped markup
//! - [`page`]: Container lookup and in-memory documents
//! - [`backend`]: Authenticated GET transport
//! - [`loader`]: The fetch-and-render operations
//! - [`storage`]: Persistent key/value store holding the token
//! - [`config`]: TOML configuration (native only)
//!
//! The core compiles without the `native` feature, so the browser host can
//! share it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use secret_snake::{read_token, Document, FileStore, HttpBackend, PageDataLoader, TOKEN_KEY};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileStore::new(FileStore::default_path());
//!     let token = read_token(&store, TOKEN_KEY)?;
//!
//!     let backend = HttpBackend::new("http://localhost:8000")?;
//!     let loader = PageDataLoader::new(backend, token);
//!
//!     let page = Document::with_containers(["assignment-container", "tips-container"]);
//!     let report = loader.on_ready(&page).await;
//!
//!     println!("{:?}\n{}", report, page.to_html());
//!     Ok(())
//! }
//! ```

pub mod backend;
#[cfg(feature = "native")]
pub mod config;
pub mod loader;
pub mod model;
pub mod page;
pub mod storage;
pub mod view;

// Re-export top-level types for convenience
pub use backend::{Backend, FetchError, RawResponse};
#[cfg(feature = "native")]
pub use backend::HttpBackend;

pub use loader::{ContainerIds, Endpoints, LoadReport, Outcome, PageDataLoader};

pub use model::{Assignment, AuthToken, Tip, UserId};

pub use page::{Container, ContainerHandle, Document, Page, PageError};

pub use storage::{read_token, KeyValueStore, MemoryStore, StorageError, StorageResult, TOKEN_KEY};
#[cfg(feature = "native")]
pub use storage::FileStore;

pub use view::View;

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig};
