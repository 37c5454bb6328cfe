//! `storefront-client`
//!
//! **Responsibility:** data access against the recommendation service.
//!
//! Two read operations, no retries, no caching:
//! - `GET /products/` → the catalog
//! - `GET /products/{id}/recommendations` → ranked alternatives
//!
//! The client compiles for native targets and for `wasm32` (reqwest uses the
//! browser `fetch` there).

pub mod api;
pub mod config;
pub mod error;

pub use api::{CatalogApi, HttpCatalogApi};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::ApiError;
