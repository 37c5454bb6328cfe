//! `storefront-web`
//!
//! **Responsibility:** client-side state for the storefront.
//!
//! This crate provides:
//! - Catalog state (load once, derived categories, category filtering)
//! - Product detail resolution with stale-response protection
//! - Per-recommendation explanation disclosure
//! - Render models shared by the Leptos frontend and the headless CLI
//!
//! The state types are plain Rust with no UI dependency; the frontend wraps
//! them in signals.

pub mod catalog;
pub mod detail;
pub mod disclosure;
pub mod types;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use catalog::{ALL_CATEGORIES, CatalogState, derive_categories, filter_products};
pub use detail::{DetailPhase, ProductDetailResolver, ProductLookup, RequestToken};
pub use disclosure::DisclosureTracker;
pub use types::LoadState;
