//! Render models: what each view shows, derived from state without touching
//! the DOM. The Leptos components and the CLI both render from these.

use storefront_core::display::category_label;
use storefront_core::{Product, ProductId, Recommendation, format_price, format_score};

use crate::catalog::CatalogState;
use crate::detail::{ProductDetailResolver, ProductLookup};
use crate::disclosure::DisclosureTracker;
use crate::types::LoadState;

pub const EMPTY_CATEGORY_MESSAGE: &str = "No products available in this category.";
pub const LOADING_CATALOG_MESSAGE: &str = "Loading products...";
pub const LOADING_PRODUCT_MESSAGE: &str = "Loading product...";
pub const LOADING_RECOMMENDATIONS_MESSAGE: &str = "Loading recommendations...";
pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product not found.";
pub const NO_RECOMMENDATIONS_MESSAGE: &str = "No recommendations for this product.";
pub const SHOW_EXPLANATION_LABEL: &str = "Why this product?";
pub const HIDE_EXPLANATION_LABEL: &str = "Hide explanation";

/// Route to a product's detail page.
pub fn product_href(id: ProductId) -> String {
    format!("/products/{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: ProductId,
    pub href: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
    /// Image URL; `None` renders [`storefront_core::PLACEHOLDER_IMAGE`].
    pub image: Option<String>,
}

impl ProductCardView {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            href: product_href(product.id),
            title: product.title.clone(),
            category: category_label(Some(&product.category)).to_string(),
            description: product.description.clone(),
            price: format_price(product.price),
            image: product.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryButton {
    /// Filter value passed back to `set_active_category`.
    pub value: String,
    pub label: String,
    pub active: bool,
}

pub fn category_buttons(catalog: &CatalogState) -> Vec<CategoryButton> {
    catalog
        .categories()
        .iter()
        .map(|value| CategoryButton {
            value: value.clone(),
            label: category_label(Some(value)).to_string(),
            active: value == catalog.active_category(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogGrid {
    Loading,
    Failed(String),
    /// Loaded, but nothing under the active filter.
    Empty,
    Cards(Vec<ProductCardView>),
}

pub fn catalog_grid(catalog: &CatalogState) -> CatalogGrid {
    match catalog.status() {
        LoadState::Idle | LoadState::Loading => CatalogGrid::Loading,
        LoadState::Failed(err) => CatalogGrid::Failed(err.user_message().to_string()),
        LoadState::Loaded(_) => {
            let cards: Vec<_> = catalog
                .filtered_view()
                .into_iter()
                .map(ProductCardView::from_product)
                .collect();
            if cards.is_empty() {
                CatalogGrid::Empty
            } else {
                CatalogGrid::Cards(cards)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSection {
    Loading,
    Failed(String),
    NotFound,
    Found(ProductCardView),
}

pub fn product_section(resolver: &ProductDetailResolver) -> ProductSection {
    match resolver.product() {
        LoadState::Idle | LoadState::Loading => ProductSection::Loading,
        LoadState::Failed(err) => ProductSection::Failed(err.user_message().to_string()),
        LoadState::Loaded(ProductLookup::NotFound) => ProductSection::NotFound,
        LoadState::Loaded(ProductLookup::Found(product)) => {
            ProductSection::Found(ProductCardView::from_product(product))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRow {
    pub id: ProductId,
    pub href: String,
    pub title: String,
    pub category: String,
    pub price: String,
    pub score: String,
    pub image: Option<String>,
    /// Only recommendations with a non-empty explanation get a toggle.
    pub show_toggle: bool,
    pub toggle_label: &'static str,
    /// Explanation text, present only while expanded.
    pub explanation: Option<String>,
}

impl RecommendationRow {
    pub fn from_recommendation(rec: &Recommendation, disclosure: &DisclosureTracker) -> Self {
        let text = rec.explanation_text();
        let expanded = text.is_some() && disclosure.is_visible(rec.id);
        Self {
            id: rec.id,
            href: product_href(rec.id),
            title: rec.title.clone(),
            category: category_label(rec.category.as_deref()).to_string(),
            price: format_price(rec.price),
            score: format_score(rec.score),
            image: rec.image.clone(),
            show_toggle: text.is_some(),
            toggle_label: if expanded { HIDE_EXPLANATION_LABEL } else { SHOW_EXPLANATION_LABEL },
            explanation: text.filter(|_| expanded).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationSection {
    Loading,
    Failed(String),
    /// The service does not know the source product.
    NotFound,
    Empty,
    Rows(Vec<RecommendationRow>),
}

pub fn recommendation_section(
    resolver: &ProductDetailResolver,
    disclosure: &DisclosureTracker,
) -> RecommendationSection {
    match resolver.recommendations() {
        LoadState::Idle | LoadState::Loading => RecommendationSection::Loading,
        LoadState::Failed(err) if err.is_not_found() => RecommendationSection::NotFound,
        LoadState::Failed(err) => RecommendationSection::Failed(err.user_message().to_string()),
        LoadState::Loaded(recs) if recs.is_empty() => RecommendationSection::Empty,
        LoadState::Loaded(recs) => RecommendationSection::Rows(
            recs.iter()
                .map(|rec| RecommendationRow::from_recommendation(rec, disclosure))
                .collect(),
        ),
    }
}
