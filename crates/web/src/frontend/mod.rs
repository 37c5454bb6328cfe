//! Leptos CSR frontend (built with Trunk for `wasm32`).

pub mod api;
pub mod app;

use wasm_bindgen::prelude::*;

/// WASM entry point for the frontend.
/// This is called automatically when the WASM module loads.
#[wasm_bindgen(start)]
pub fn main() {
    // Panic hook + console tracing
    storefront_observability::init();

    leptos::mount_to_body(app::App);
}
