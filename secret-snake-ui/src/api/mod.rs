//! Backend API
//!
//! gloo-net transport for the shared loader.

mod client;

pub use client::{get_api_base, GlooBackend};
