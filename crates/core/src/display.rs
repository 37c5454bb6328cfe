//! Display fallbacks for optional attributes.
//!
//! Every optional field has exactly one textual fallback so renderers never
//! branch on "falsy" values.

use crate::product::Price;

/// Shown in place of a missing product/recommendation image.
pub const PLACEHOLDER_IMAGE: &str = "📦";

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";
pub const SCORE_UNAVAILABLE: &str = "N/A";

/// `$12.30` for a present price, the fallback otherwise.
pub fn format_price(price: Option<Price>) -> String {
    match price {
        Some(price) => format!("${:.2}", price.amount()),
        None => PRICE_UNAVAILABLE.to_string(),
    }
}

/// Relevance score with three decimals, or `N/A`.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) if score.is_finite() => format!("{score:.3}"),
        _ => SCORE_UNAVAILABLE.to_string(),
    }
}

/// Category label, falling back when the value is absent or blank.
pub fn category_label(category: Option<&str>) -> &str {
    match category {
        Some(category) if !category.trim().is_empty() => category,
        _ => UNCATEGORIZED,
    }
}
