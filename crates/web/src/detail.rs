//! Product detail resolution: one product plus its recommendations.
//!
//! Every identifier change starts a new request and hands out a
//! [`RequestToken`]. Responses are applied only when they carry the token of
//! the most recent request; anything older is dropped on arrival, whatever
//! order the network completes in.

use storefront_client::{ApiError, CatalogApi};
use storefront_core::{Product, ProductId, Recommendation, RecommendationsResponse};

use crate::catalog::CatalogState;
use crate::types::LoadState;

/// Ties an in-flight response to the request that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    seq: u64,
    product_id: Option<ProductId>,
}

impl RequestToken {
    /// Normalized identifier, `None` when the raw identifier did not parse.
    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }
}

/// Outcome of looking the active identifier up in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductLookup {
    Found(Product),
    /// No catalog entry carries this identifier. Not an error.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    /// No identifier selected.
    Idle,
    Loading,
    Resolved,
    /// At least one read failed with a transport error.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductDetailResolver {
    last_seq: u64,
    current: Option<RequestToken>,
    product: LoadState<ProductLookup>,
    recommendations: LoadState<Vec<Recommendation>>,
}

impl ProductDetailResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&mut self, product_id: Option<ProductId>) -> RequestToken {
        self.last_seq += 1;
        let token = RequestToken { seq: self.last_seq, product_id };
        self.current = Some(token);
        token
    }

    /// Start resolving `product_id`. Anything shown for a previous identifier
    /// is cleared immediately.
    pub fn begin(&mut self, product_id: ProductId) -> RequestToken {
        let token = self.next_token(Some(product_id));
        self.product = LoadState::Loading;
        self.recommendations = LoadState::Loading;
        tracing::debug!(%product_id, token = token.seq, "detail load started");
        token
    }

    /// Start resolving a raw route identifier.
    ///
    /// Text that is not a valid identifier cannot match any product, so it
    /// resolves to "not found" at once and the returned token carries no
    /// identifier (nothing to fetch).
    pub fn select(&mut self, raw: &str) -> RequestToken {
        match raw.parse::<ProductId>() {
            Ok(product_id) => self.begin(product_id),
            Err(err) => {
                tracing::debug!(raw, error = %err, "unparseable product identifier");
                let token = self.next_token(None);
                self.product = LoadState::Loaded(ProductLookup::NotFound);
                self.recommendations = LoadState::Loaded(Vec::new());
                token
            }
        }
    }

    pub fn current_token(&self) -> Option<RequestToken> {
        self.current
    }

    pub fn active_id(&self) -> Option<ProductId> {
        self.current.and_then(|t| t.product_id)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Token still waiting for the catalog lookup, if any.
    pub fn awaiting_catalog(&self) -> Option<RequestToken> {
        self.current.filter(|_| self.product.is_loading())
    }

    /// Token still waiting for recommendations, if any.
    pub fn awaiting_recommendations(&self) -> Option<RequestToken> {
        self.current.filter(|_| self.recommendations.is_loading())
    }

    /// Locate the active product in `catalog`. Returns `false` (and changes
    /// nothing) when `token` is stale.
    pub fn apply_catalog(&mut self, token: RequestToken, catalog: Result<&[Product], ApiError>) -> bool {
        if !self.is_current(token) {
            tracing::debug!(token = token.seq, "discarding stale catalog lookup");
            return false;
        }
        let Some(product_id) = token.product_id else {
            return false;
        };

        self.product = match catalog {
            Ok(products) => match products.iter().find(|p| p.id == product_id) {
                Some(product) => LoadState::Loaded(ProductLookup::Found(product.clone())),
                None => {
                    tracing::info!(%product_id, "product not in catalog");
                    LoadState::Loaded(ProductLookup::NotFound)
                }
            },
            Err(err) => LoadState::Failed(err),
        };
        true
    }

    /// Store the recommendations fetched for `token`. Returns `false` (and
    /// changes nothing) when `token` is stale.
    pub fn apply_recommendations(
        &mut self,
        token: RequestToken,
        result: Result<RecommendationsResponse, ApiError>,
    ) -> bool {
        if !self.is_current(token) {
            tracing::debug!(token = token.seq, "discarding stale recommendations");
            return false;
        }
        if token.product_id.is_none() {
            return false;
        }

        self.recommendations = LoadState::from_result(result.map(|resp| resp.recommendations));
        true
    }

    pub fn product(&self) -> &LoadState<ProductLookup> {
        &self.product
    }

    /// The resolved product, if the lookup found one.
    pub fn resolved_product(&self) -> Option<&Product> {
        match self.product.value() {
            Some(ProductLookup::Found(product)) => Some(product),
            _ => None,
        }
    }

    pub fn recommendations(&self) -> &LoadState<Vec<Recommendation>> {
        &self.recommendations
    }

    pub fn phase(&self) -> DetailPhase {
        if self.current.is_none() {
            return DetailPhase::Idle;
        }
        if self.product.is_loading() || self.recommendations.is_loading() {
            return DetailPhase::Loading;
        }
        let transport_failure = [self.product.error(), self.recommendations.error()]
            .into_iter()
            .flatten()
            .any(ApiError::is_transport);
        if transport_failure {
            DetailPhase::Failed
        } else {
            DetailPhase::Resolved
        }
    }

    /// Resolve `product_id` end to end: the catalog lookup (reusing `catalog`,
    /// loading it first if needed) and the recommendation fetch run
    /// concurrently, and both outcomes are applied.
    pub async fn resolve<A: CatalogApi + ?Sized>(
        &mut self,
        api: &A,
        catalog: &mut CatalogState,
        product_id: ProductId,
    ) -> DetailPhase {
        let token = self.begin(product_id);

        let (products, recommendations) = futures::join!(
            catalog.ensure_loaded(api),
            api.fetch_recommendations(product_id)
        );

        self.apply_catalog(token, products);
        self.apply_recommendations(token, recommendations);
        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use storefront_core::Price;
    use tokio::sync::oneshot;

    fn product(id: u64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: "desc".to_string(),
            image: None,
            category: "Books".to_string(),
            price: Some(Price::new(10.0).unwrap()),
        }
    }

    fn rec(id: u64) -> Recommendation {
        Recommendation {
            id: ProductId::new(id),
            title: format!("Rec {id}"),
            image: None,
            category: None,
            price: None,
            score: Some(0.5),
            explanation: None,
        }
    }

    fn recs_for(source: u64) -> RecommendationsResponse {
        RecommendationsResponse {
            product_id: Some(ProductId::new(source)),
            recommendations: vec![rec(source * 10), rec(source * 10 + 1)],
        }
    }

    fn rec_ids(resolver: &ProductDetailResolver) -> Option<Vec<u64>> {
        resolver
            .recommendations()
            .value()
            .map(|recs| recs.iter().map(|r| r.id.get()).collect())
    }

    #[test]
    fn new_resolver_is_idle() {
        let resolver = ProductDetailResolver::new();
        assert_eq!(resolver.phase(), DetailPhase::Idle);
        assert_eq!(resolver.active_id(), None);
    }

    #[test]
    fn begin_clears_previous_state() {
        let catalog = vec![product(1), product(2)];
        let mut resolver = ProductDetailResolver::new();

        let t1 = resolver.begin(ProductId::new(1));
        resolver.apply_catalog(t1, Ok(catalog.as_slice()));
        resolver.apply_recommendations(t1, Ok(recs_for(1)));
        assert_eq!(resolver.phase(), DetailPhase::Resolved);

        resolver.begin(ProductId::new(2));

        assert_eq!(resolver.phase(), DetailPhase::Loading);
        assert!(resolver.product().is_loading());
        assert!(resolver.recommendations().is_loading());
        assert!(resolver.resolved_product().is_none());
    }

    #[test]
    fn resolves_product_and_recommendations() {
        let catalog = vec![product(1), product(42)];
        let mut resolver = ProductDetailResolver::new();

        let token = resolver.select("42");
        assert!(resolver.apply_catalog(token, Ok(catalog.as_slice())));
        assert!(resolver.apply_recommendations(token, Ok(recs_for(42))));

        assert_eq!(resolver.phase(), DetailPhase::Resolved);
        assert_eq!(resolver.resolved_product().map(|p| p.id), Some(ProductId::new(42)));
        assert_eq!(rec_ids(&resolver), Some(vec![420, 421]));
    }

    #[test]
    fn padded_identifier_matches_numeric_catalog_id() {
        let catalog = vec![product(7)];
        let mut resolver = ProductDetailResolver::new();

        let token = resolver.select("007");
        resolver.apply_catalog(token, Ok(catalog.as_slice()));

        assert_eq!(resolver.resolved_product().map(|p| p.id), Some(ProductId::new(7)));
    }

    #[test]
    fn missing_product_is_not_found_but_recommendations_still_show() {
        let catalog = vec![product(1)];
        let mut resolver = ProductDetailResolver::new();

        let token = resolver.begin(ProductId::new(5));
        resolver.apply_catalog(token, Ok(catalog.as_slice()));
        resolver.apply_recommendations(token, Ok(recs_for(5)));

        assert_eq!(resolver.product().value(), Some(&ProductLookup::NotFound));
        assert_eq!(resolver.phase(), DetailPhase::Resolved);
        assert_eq!(rec_ids(&resolver), Some(vec![50, 51]));
    }

    #[test]
    fn unparseable_identifier_resolves_to_not_found_without_fetching() {
        let mut resolver = ProductDetailResolver::new();

        let token = resolver.select("abc");

        assert_eq!(token.product_id(), None);
        assert_eq!(resolver.product().value(), Some(&ProductLookup::NotFound));
        assert_eq!(resolver.phase(), DetailPhase::Resolved);
        assert!(resolver.awaiting_catalog().is_none());
        assert!(resolver.awaiting_recommendations().is_none());
        assert!(!resolver.apply_recommendations(token, Ok(recs_for(1))));
    }

    #[test]
    fn recommendation_failure_keeps_resolved_product() {
        let catalog = vec![product(42)];
        let mut resolver = ProductDetailResolver::new();

        let t1 = resolver.begin(ProductId::new(1));
        resolver.apply_recommendations(t1, Ok(recs_for(1)));

        let t2 = resolver.begin(ProductId::new(42));
        resolver.apply_catalog(t2, Ok(catalog.as_slice()));
        resolver.apply_recommendations(t2, Err(ApiError::Network("timeout".into())));

        assert_eq!(resolver.resolved_product().map(|p| p.id), Some(ProductId::new(42)));
        assert_eq!(resolver.recommendations().error(), Some(&ApiError::Network("timeout".into())));
        assert_eq!(rec_ids(&resolver), None, "no stale recommendations from product 1");
        assert_eq!(resolver.phase(), DetailPhase::Failed);
    }

    #[test]
    fn recommendations_not_found_is_not_a_failure() {
        let mut resolver = ProductDetailResolver::new();

        let catalog: Vec<Product> = Vec::new();
        let token = resolver.begin(ProductId::new(9));
        resolver.apply_catalog(token, Ok(catalog.as_slice()));
        resolver.apply_recommendations(token, Err(ApiError::NotFound));

        assert_eq!(resolver.phase(), DetailPhase::Resolved);
    }

    #[test]
    fn catalog_failure_is_recorded() {
        let mut resolver = ProductDetailResolver::new();

        let token = resolver.begin(ProductId::new(3));
        resolver.apply_catalog(token, Err(ApiError::Status(500, String::new())));
        resolver.apply_recommendations(token, Ok(recs_for(3)));

        assert!(resolver.product().error().is_some());
        assert_eq!(rec_ids(&resolver), Some(vec![30, 31]));
        assert_eq!(resolver.phase(), DetailPhase::Failed);
    }

    #[test]
    fn stale_recommendations_are_discarded() {
        let mut resolver = ProductDetailResolver::new();

        let t1 = resolver.begin(ProductId::new(1));
        let t2 = resolver.begin(ProductId::new(2));

        assert!(resolver.apply_recommendations(t2, Ok(recs_for(2))));
        assert!(!resolver.apply_recommendations(t1, Ok(recs_for(1))));

        assert_eq!(rec_ids(&resolver), Some(vec![20, 21]));
    }

    #[test]
    fn stale_response_arriving_first_does_not_settle_new_request() {
        let catalog = vec![product(1), product(2)];
        let mut resolver = ProductDetailResolver::new();

        let t1 = resolver.begin(ProductId::new(1));
        let t2 = resolver.begin(ProductId::new(2));

        assert!(!resolver.apply_recommendations(t1, Ok(recs_for(1))));
        assert!(!resolver.apply_catalog(t1, Ok(catalog.as_slice())));
        assert_eq!(resolver.phase(), DetailPhase::Loading);
        assert_eq!(resolver.awaiting_catalog(), Some(t2));
        assert_eq!(resolver.awaiting_recommendations(), Some(t2));
    }

    #[test]
    fn reselecting_same_identifier_invalidates_older_token() {
        let mut resolver = ProductDetailResolver::new();

        let old = resolver.begin(ProductId::new(1));
        let new = resolver.begin(ProductId::new(1));

        assert_ne!(old, new);
        assert!(!resolver.apply_recommendations(old, Ok(recs_for(1))));
        assert!(resolver.apply_recommendations(new, Ok(recs_for(1))));
    }

    /// Catalog is immediate; recommendations wait until the test releases them.
    struct GatedApi {
        catalog: Vec<Product>,
        gates: RefCell<HashMap<ProductId, oneshot::Receiver<RecommendationsResponse>>>,
    }

    #[async_trait(?Send)]
    impl CatalogApi for GatedApi {
        async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError> {
            Ok(self.catalog.clone())
        }

        async fn fetch_recommendations(
            &self,
            product_id: ProductId,
        ) -> Result<RecommendationsResponse, ApiError> {
            let gate = self.gates.borrow_mut().remove(&product_id);
            match gate {
                Some(rx) => rx.await.map_err(|e| ApiError::Network(e.to_string())),
                None => Err(ApiError::NotFound),
            }
        }
    }

    #[tokio::test]
    async fn late_response_for_previous_identifier_is_ignored() {
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let api = GatedApi {
            catalog: vec![product(1), product(2)],
            gates: RefCell::new(HashMap::from([
                (ProductId::new(1), rx1),
                (ProductId::new(2), rx2),
            ])),
        };
        let resolver = RefCell::new(ProductDetailResolver::new());

        // Same shape as the page: each identifier change spawns its own fetch
        // that applies its result when it lands.
        let t1 = resolver.borrow_mut().begin(ProductId::new(1));
        let first = async {
            let result = api.fetch_recommendations(ProductId::new(1)).await;
            resolver.borrow_mut().apply_recommendations(t1, result)
        };
        let t2 = resolver.borrow_mut().begin(ProductId::new(2));
        let second = async {
            let result = api.fetch_recommendations(ProductId::new(2)).await;
            resolver.borrow_mut().apply_recommendations(t2, result)
        };
        let network = async {
            tx2.send(recs_for(2)).unwrap();
            tokio::task::yield_now().await;
            tx1.send(recs_for(1)).unwrap();
        };

        let (applied_first, applied_second, ()) = futures::join!(first, second, network);

        assert!(!applied_first);
        assert!(applied_second);
        assert_eq!(rec_ids(&resolver.borrow()), Some(vec![20, 21]));
    }

    #[tokio::test]
    async fn resolve_loads_catalog_when_missing() {
        let (tx, rx) = oneshot::channel();
        tx.send(RecommendationsResponse::default()).unwrap();
        let api = GatedApi {
            catalog: vec![product(42)],
            gates: RefCell::new(HashMap::from([(ProductId::new(42), rx)])),
        };
        let mut catalog = CatalogState::new();
        let mut resolver = ProductDetailResolver::new();

        let phase = resolver.resolve(&api, &mut catalog, ProductId::new(42)).await;

        assert_eq!(phase, DetailPhase::Resolved);
        assert!(catalog.is_loaded());
        assert_eq!(resolver.resolved_product().map(|p| p.id), Some(ProductId::new(42)));
        assert_eq!(rec_ids(&resolver), Some(vec![]));
    }

    #[tokio::test]
    async fn resolve_reports_unknown_product() {
        let api = GatedApi {
            catalog: vec![product(1)],
            gates: RefCell::new(HashMap::new()),
        };
        let mut catalog = CatalogState::new();
        let mut resolver = ProductDetailResolver::new();

        let phase = resolver.resolve(&api, &mut catalog, ProductId::new(77)).await;

        assert_eq!(phase, DetailPhase::Resolved);
        assert_eq!(resolver.product().value(), Some(&ProductLookup::NotFound));
        assert_eq!(resolver.recommendations().error(), Some(&ApiError::NotFound));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whatever order responses arrive in, only the latest
        /// requested identifier's recommendations become visible.
        #[test]
        fn only_latest_request_is_visible(
            requested in prop::collection::vec(1u64..50, 1..8),
            order in prop::collection::vec(any::<prop::sample::Index>(), 0..16)
        ) {
            let mut resolver = ProductDetailResolver::new();
            let mut pending: Vec<(RequestToken, u64)> = requested
                .iter()
                .map(|&id| (resolver.begin(ProductId::new(id)), id))
                .collect();
            let latest = *requested.last().unwrap();

            // Deliver in an arbitrary order, then flush whatever is left.
            for pick in order {
                if pending.is_empty() {
                    break;
                }
                let (token, id) = pending.remove(pick.index(pending.len()));
                resolver.apply_recommendations(token, Ok(recs_for(id)));
            }
            for (token, id) in pending {
                resolver.apply_recommendations(token, Ok(recs_for(id)));
            }

            prop_assert_eq!(rec_ids(&resolver), Some(vec![latest * 10, latest * 10 + 1]));
        }
    }
}
