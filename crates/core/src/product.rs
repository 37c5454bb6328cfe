//! Catalog and recommendation read models (match the service's JSON shapes).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::ProductId;

/// Non-negative decimal price as sent by the service.
///
/// A negative value is rejected during deserialization, which surfaces as a
/// malformed response rather than a product with a nonsensical price.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub fn new(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation(format!("price must be finite, got {amount}")));
        }
        if amount < 0.0 {
            return Err(DomainError::validation(format!("price must be non-negative, got {amount}")));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Empty when the service omits it or sends `null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default)]
    pub price: Option<Price>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A suggested alternative for one source product.
///
/// Every attribute besides `id` and `title` is optional on the wire; absence is
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Recommendation {
    /// Explanation text, if present and not blank.
    pub fn explanation_text(&self) -> Option<&str> {
        self.explanation
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn has_explanation(&self) -> bool {
        self.explanation_text().is_some()
    }
}

/// Body of `GET /products/{id}/recommendations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    /// Source product echoed back by the service (not always present).
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Server-ordered recommendations; an absent field means none.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}
