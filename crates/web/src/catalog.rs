//! Catalog state: the loaded products, derived categories and active filter.

use std::collections::HashSet;

use storefront_client::{ApiError, CatalogApi};
use storefront_core::{Product, ProductId};

use crate::types::LoadState;

/// Synthetic category meaning "no narrowing". Always first in the category set.
pub const ALL_CATEGORIES: &str = "All";

/// `"All"` followed by each distinct category, in order of first appearance.
pub fn derive_categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        if seen.insert(product.category.as_str()) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// Products visible under `category`, in catalog order.
pub fn filter_products<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    if category == ALL_CATEGORIES {
        return products.iter().collect();
    }
    products.iter().filter(|p| p.category == category).collect()
}

/// Owner of the session's catalog.
///
/// `load` fetches at most once; `refresh` fetches again unconditionally and
/// keeps a loaded catalog usable until (and unless) the new one arrives. The
/// synchronous halves (`begin_load`/`begin_refresh` + `apply_load`) exist for
/// reactive callers that cannot hold `&mut self` across an `await`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    products: LoadState<Vec<Product>>,
    categories: Vec<String>,
    active_category: String,
    refreshing: bool,
    /// Failure of a reload that left the previous catalog in place.
    refresh_error: Option<ApiError>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self {
            products: LoadState::Idle,
            categories: vec![ALL_CATEGORIES.to_string()],
            active_category: ALL_CATEGORIES.to_string(),
            refreshing: false,
            refresh_error: None,
        }
    }

    /// Build an already-loaded catalog.
    pub fn with_products(products: Vec<Product>) -> Self {
        let mut state = Self::new();
        state.apply_load(Ok(products));
        state
    }

    pub fn status(&self) -> &LoadState<Vec<Product>> {
        &self.products
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.products, LoadState::Loaded(_))
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Failure of the last fetch: a failed first load, or a failed reload over
    /// a catalog that is still loaded.
    pub fn error(&self) -> Option<&ApiError> {
        self.products.error().or(self.refresh_error.as_ref())
    }

    /// Loaded products, or an empty slice while unloaded/failed.
    pub fn products(&self) -> &[Product] {
        self.products.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products().iter().find(|p| p.id == id)
    }

    /// Mark a first load as started. Returns `false` when a load was already
    /// issued this session (in flight, done, or failed), so no fetch is needed.
    pub fn begin_load(&mut self) -> bool {
        if !matches!(self.products, LoadState::Idle) {
            return false;
        }
        self.products = LoadState::Loading;
        tracing::info!("catalog load started");
        true
    }

    /// Mark a forced reload as started. The current products stay visible
    /// until the response arrives.
    pub fn begin_refresh(&mut self) {
        tracing::info!("catalog refresh started");
        if self.is_loaded() {
            self.refreshing = true;
        } else {
            self.products = LoadState::Loading;
        }
    }

    /// Store the outcome of a catalog fetch and re-derive categories.
    pub fn apply_load(&mut self, result: Result<Vec<Product>, ApiError>) {
        self.refreshing = false;
        match result {
            Ok(products) => {
                self.categories = derive_categories(&products);
                tracing::info!(
                    count = products.len(),
                    categories = self.categories.len() - 1,
                    "catalog loaded"
                );
                self.products = LoadState::Loaded(products);
                self.refresh_error = None;
            }
            Err(err) if self.is_loaded() => {
                tracing::warn!(error = %err, "catalog refresh failed, keeping loaded catalog");
                self.refresh_error = Some(err);
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog load failed");
                self.categories = vec![ALL_CATEGORIES.to_string()];
                self.products = LoadState::Failed(err);
            }
        }

        if !self.categories.iter().any(|c| *c == self.active_category) {
            self.active_category = ALL_CATEGORIES.to_string();
        }
    }

    /// Fetch the catalog unless a load was already issued this session.
    pub async fn load<A: CatalogApi + ?Sized>(&mut self, api: &A) {
        if self.begin_load() {
            let result = api.fetch_catalog().await;
            self.apply_load(result);
        }
    }

    /// Fetch the catalog again, replacing whatever was loaded on success.
    pub async fn refresh<A: CatalogApi + ?Sized>(&mut self, api: &A) {
        self.begin_refresh();
        let result = api.fetch_catalog().await;
        self.apply_load(result);
    }

    /// Loaded products, fetching them first if they are not available yet
    /// (never requested, or a previous attempt failed).
    pub async fn ensure_loaded<A: CatalogApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<&[Product], ApiError> {
        if self.is_loaded() {
            return Ok(self.products());
        }

        self.begin_refresh();
        match api.fetch_catalog().await {
            Ok(products) => {
                self.apply_load(Ok(products));
                Ok(self.products())
            }
            Err(err) => {
                self.apply_load(Err(err.clone()));
                Err(err)
            }
        }
    }

    /// The catalog as a lookup source for detail resolution: `None` while no
    /// outcome is known yet.
    pub fn lookup_source(&self) -> Option<Result<&[Product], ApiError>> {
        match &self.products {
            LoadState::Loaded(products) => Some(Ok(products.as_slice())),
            LoadState::Failed(err) => Some(Err(err.clone())),
            LoadState::Idle | LoadState::Loading => None,
        }
    }

    /// Select a category. Any value is accepted; unknown categories simply
    /// match nothing.
    pub fn set_active_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        tracing::debug!(%category, "active category changed");
        self.active_category = category;
    }

    /// Products under the active filter, in catalog order.
    pub fn filtered_view(&self) -> Vec<&Product> {
        filter_products(self.products(), &self.active_category)
    }
}
