//! `storefront-core` — catalog domain primitives.
//!
//! This crate contains the **pure** data model shared by the data access layer
//! and the client state (no transport, no UI). Everything here must compile for
//! `wasm32-unknown-unknown`.

pub mod display;
pub mod error;
pub mod id;
pub mod product;

pub use display::{PLACEHOLDER_IMAGE, format_price, format_score};
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use product::{Price, Product, Recommendation, RecommendationsResponse};
