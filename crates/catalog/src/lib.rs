//! Catalog adapters for fleetbot.
//!
//! - `http` talks to the rental catalog service over HTTPS
//! - `memory` serves a fixed fleet for tests and offline runs

pub mod http;
pub mod memory;

pub use http::HttpCatalog;
pub use memory::InMemoryCatalog;
