//! Glue between the data access layer and the reactive state.
//!
//! Every fetch is spawned on the browser's event loop; results are folded back
//! into signals through the state types' `apply_*` methods, so a failure always
//! ends up as state and never as an uncaught error.

use leptos::*;

use storefront_client::{CatalogApi, HttpCatalogApi};

use crate::catalog::CatalogState;
use crate::detail::{ProductDetailResolver, RequestToken};
use crate::disclosure::DisclosureTracker;

/// Start the session's catalog load, unless one was already issued.
pub fn load_catalog(catalog: RwSignal<CatalogState>, api: HttpCatalogApi) {
    if !catalog.try_update(CatalogState::begin_load).unwrap_or(false) {
        return;
    }
    spawn_local(async move {
        let result = api.fetch_catalog().await;
        catalog.update(|state| state.apply_load(result));
    });
}

/// Fetch the catalog again (user-initiated retry).
pub fn refresh_catalog(catalog: RwSignal<CatalogState>, api: HttpCatalogApi) {
    catalog.update(CatalogState::begin_refresh);
    spawn_local(async move {
        let result = api.fetch_catalog().await;
        catalog.update(|state| state.apply_load(result));
    });
}

/// Switch the detail view to `raw` and fetch its recommendations.
pub fn select_product(
    resolver: RwSignal<ProductDetailResolver>,
    disclosure: RwSignal<DisclosureTracker>,
    raw: String,
    api: HttpCatalogApi,
) {
    let Some(token) = resolver.try_update(|r| r.select(&raw)) else {
        return;
    };
    disclosure.update(|d| d.rescope(token));

    let Some(product_id) = token.product_id() else {
        return;
    };
    spawn_local(async move {
        let result = api.fetch_recommendations(product_id).await;
        resolver.update(|r| {
            r.apply_recommendations(token, result);
        });
    });
}

/// Resolve `token`'s product from the shared catalog once it has an outcome,
/// starting the catalog load if nobody has yet.
pub fn lookup_in_catalog(
    resolver: RwSignal<ProductDetailResolver>,
    catalog: RwSignal<CatalogState>,
    token: RequestToken,
    api: HttpCatalogApi,
) {
    let settled = catalog.with(|c| c.lookup_source().is_some());
    if !settled {
        load_catalog(catalog, api);
        return;
    }
    catalog.with_untracked(|c| {
        if let Some(source) = c.lookup_source() {
            resolver.update(|r| {
                r.apply_catalog(token, source);
            });
        }
    });
}
