//! HTTP bindings for the two read endpoints.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use storefront_core::{Product, ProductId, RecommendationsResponse};

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Read operations the client state depends on.
///
/// `?Send` because the browser futures (`fetch`) are not `Send`; every caller
/// runs on a single-threaded executor anyway.
#[async_trait(?Send)]
pub trait CatalogApi {
    /// `GET /products/`: the full catalog, in server order.
    async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError>;

    /// `GET /products/{id}/recommendations`.
    ///
    /// A 404 maps to [`ApiError::NotFound`]; an absent `recommendations` field
    /// yields an empty sequence.
    async fn fetch_recommendations(
        &self,
        product_id: ProductId,
    ) -> Result<RecommendationsResponse, ApiError>;
}

/// `reqwest`-backed implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpCatalogApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue a GET and decode the body. `not_found` decides whether a 404 is a
    /// logical "unknown product" or just another failed status.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, not_found: bool) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if not_found && status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), resp.text().await.unwrap_or_default()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait(?Send)]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.config.endpoint("/products/");
        tracing::debug!(%url, "fetching catalog");

        match self.get_json::<Vec<Product>>(&url, false).await {
            Ok(products) => {
                tracing::info!(count = products.len(), "catalog fetched");
                Ok(products)
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog fetch failed");
                Err(err)
            }
        }
    }

    async fn fetch_recommendations(
        &self,
        product_id: ProductId,
    ) -> Result<RecommendationsResponse, ApiError> {
        let url = self
            .config
            .endpoint(&format!("/products/{product_id}/recommendations"));
        tracing::debug!(%url, %product_id, "fetching recommendations");

        match self.get_json::<RecommendationsResponse>(&url, true).await {
            Ok(resp) => {
                tracing::info!(%product_id, count = resp.recommendations.len(), "recommendations fetched");
                Ok(resp)
            }
            Err(err) => {
                tracing::warn!(%product_id, error = %err, "recommendations fetch failed");
                Err(err)
            }
        }
    }
}
