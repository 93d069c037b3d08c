//! Page Abstraction
//!
//! The loader never touches a concrete document. It asks a [`Page`] for a
//! container by id and gets back a typed optional handle; a missing
//! container simply means the matching operation does not run.
//!
//! - [`Document`]: in-memory page, optionally built from an HTML template
//! - The browser host implements [`Page`] over `web_sys::Document`

mod document;
#[cfg(feature = "native")]
mod html;

pub use document::{ContainerHandle, Document};

use thiserror::Error;

use crate::view::View;

/// Capability check for page containers
pub trait Page {
    type Container: Container;

    /// Look up a container by its id. `None` when the page has no such
    /// element.
    fn container(&self, id: &str) -> Option<Self::Container>;
}

/// A page element whose content the loader may replace
pub trait Container {
    /// Replace the element's content with `view`
    fn render(&self, view: &View);
}

/// Errors that can occur while building a page from a template
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Container `{id}` is a void <{tag}> element and cannot hold content")]
    VoidElement { id: String, tag: String },

    #[error("Invalid container selector: {0}")]
    Selector(String),
}
