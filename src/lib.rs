//! Helix: an HTTP search service over multi-provider result aggregation.
//!
//! The aggregation itself (providers, caching, fallbacks) lives in the
//! `helix-search` crate. This crate wires it to an axum query interface and
//! loads its configuration from TOML.

pub mod config;
pub mod error;
pub mod server;

pub use config::{HelixConfig, ServerConfig};
pub use error::{HelixError, Result};
pub use server::SearchServer;
