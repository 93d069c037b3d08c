//! UI Components
//!
//! Leptos components mounted into the page's loader containers.

pub mod container_view;

pub use container_view::ContainerView;
