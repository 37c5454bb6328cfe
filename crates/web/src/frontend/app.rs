//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use storefront_client::{ClientConfig, HttpCatalogApi};
use storefront_core::PLACEHOLDER_IMAGE;

use crate::catalog::CatalogState;
use crate::detail::ProductDetailResolver;
use crate::disclosure::DisclosureTracker;
use crate::frontend::api;
use crate::view::{
    CatalogGrid, EMPTY_CATEGORY_MESSAGE, LOADING_CATALOG_MESSAGE, LOADING_PRODUCT_MESSAGE,
    LOADING_RECOMMENDATIONS_MESSAGE, NO_RECOMMENDATIONS_MESSAGE, PRODUCT_NOT_FOUND_MESSAGE,
    ProductCardView, ProductSection, RecommendationRow, RecommendationSection, catalog_grid,
    category_buttons, product_section, recommendation_section,
};

/// Main application component.
///
/// Owns the session's catalog and loads it once on mount.
#[component]
pub fn App() -> impl IntoView {
    let client = HttpCatalogApi::new(ClientConfig::from_build_env());
    let catalog = create_rw_signal(CatalogState::new());

    provide_context(catalog);
    provide_context(client.clone());
    api::load_catalog(catalog, client);

    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=CatalogPage/>
                    <Route path="/products/:id" view=ProductPage/>
                </Routes>
            </main>
        </Router>
    }
}

fn image_view(image: Option<String>, alt: String) -> View {
    match image {
        Some(src) => view! { <img src=src alt=alt/> }.into_view(),
        None => view! { <div class="placeholder">{PLACEHOLDER_IMAGE}</div> }.into_view(),
    }
}

/// Catalog grid with the category menu.
#[component]
fn CatalogPage() -> impl IntoView {
    let catalog = expect_context::<RwSignal<CatalogState>>();
    let client = store_value(expect_context::<HttpCatalogApi>());

    view! {
        <div class="home">
            <header class="home-header">
                <h1>"Storefront Recommendations"</h1>
            </header>

            <div class="category-menu">
                {move || {
                    catalog.with(category_buttons).into_iter().map(|button| {
                        let value = button.value.clone();
                        view! {
                            <button
                                class="category-btn"
                                class:active=button.active
                                on:click=move |_| {
                                    let value = value.clone();
                                    catalog.update(|c| c.set_active_category(value));
                                }
                            >
                                {button.label}
                            </button>
                        }
                    }).collect_view()
                }}
            </div>

            <div class="grid">
                {move || match catalog.with(catalog_grid) {
                    CatalogGrid::Loading => view! { <p>{LOADING_CATALOG_MESSAGE}</p> }.into_view(),
                    CatalogGrid::Failed(message) => view! {
                        <div class="load-error">
                            <p>{message}</p>
                            <button on:click=move |_| api::refresh_catalog(catalog, client.get_value())>
                                "Retry"
                            </button>
                        </div>
                    }.into_view(),
                    CatalogGrid::Empty => view! {
                        <p class="no-products">{EMPTY_CATEGORY_MESSAGE}</p>
                    }.into_view(),
                    CatalogGrid::Cards(cards) => cards
                        .into_iter()
                        .map(|card| view! { <ProductCard card=card/> })
                        .collect_view(),
                }}
            </div>
        </div>
    }
}

#[component]
fn ProductCard(card: ProductCardView) -> impl IntoView {
    let ProductCardView { href, title, category, description, price, image, .. } = card;
    let image = image_view(image, title.clone());

    view! {
        <A href=href>
            <div class="product-card">
                <div class="product-image">{image}</div>
                <div class="product-info">
                    <h3>{title}</h3>
                    <p class="category">{category}</p>
                    <p class="description">{description}</p>
                    <p class="price">{price}</p>
                </div>
            </div>
        </A>
    }
}

/// Product detail page: the selected product and its recommendations.
#[component]
fn ProductPage() -> impl IntoView {
    let params = use_params_map();
    let catalog = expect_context::<RwSignal<CatalogState>>();
    let client = store_value(expect_context::<HttpCatalogApi>());
    let resolver = create_rw_signal(ProductDetailResolver::new());
    let disclosure = create_rw_signal(DisclosureTracker::new());

    // New identifier: fresh request token, cleared state, recommendation fetch.
    create_effect(move |_| {
        let raw = params.with(|p| p.get("id").cloned().unwrap_or_default());
        api::select_product(resolver, disclosure, raw, client.get_value());
    });

    // Product lookup waits on the shared catalog.
    let awaiting = create_memo(move |_| resolver.with(ProductDetailResolver::awaiting_catalog));
    create_effect(move |_| {
        if let Some(token) = awaiting.get() {
            api::lookup_in_catalog(resolver, catalog, token, client.get_value());
        }
    });

    view! {
        <div class="product-page">
            <div class="back-link"><A href="/">"← Back"</A></div>
            <div class="product-container">
                <div class="left-column">
                    {move || match resolver.with(product_section) {
                        ProductSection::Loading => view! { <p>{LOADING_PRODUCT_MESSAGE}</p> }.into_view(),
                        ProductSection::Failed(message) => view! { <p class="load-error">{message}</p> }.into_view(),
                        ProductSection::NotFound => view! { <p class="not-found">{PRODUCT_NOT_FOUND_MESSAGE}</p> }.into_view(),
                        ProductSection::Found(card) => view! { <ProductDetail card=card/> }.into_view(),
                    }}
                </div>
                <div class="right-column">
                    <h2>"Recommended Products"</h2>
                    <RecommendationList resolver=resolver disclosure=disclosure/>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ProductDetail(card: ProductCardView) -> impl IntoView {
    let ProductCardView { title, category, description, price, image, .. } = card;
    let image = image_view(image, title.clone());

    view! {
        <div class="product-card-detail">
            <div class="product-image">{image}</div>
            <div class="product-info">
                <h2>{title}</h2>
                <p class="category">{category}</p>
                <p class="description">{description}</p>
                <p class="price">{price}</p>
            </div>
        </div>
    }
}

#[component]
fn RecommendationList(
    resolver: RwSignal<ProductDetailResolver>,
    disclosure: RwSignal<DisclosureTracker>,
) -> impl IntoView {
    let section = move || resolver.with(|r| disclosure.with(|d| recommendation_section(r, d)));

    view! {
        <div class="recommendation-list">
            {move || match section() {
                RecommendationSection::Loading => view! { <p>{LOADING_RECOMMENDATIONS_MESSAGE}</p> }.into_view(),
                RecommendationSection::Failed(message) => view! { <p class="load-error">{message}</p> }.into_view(),
                RecommendationSection::NotFound => view! { <p class="not-found">{PRODUCT_NOT_FOUND_MESSAGE}</p> }.into_view(),
                RecommendationSection::Empty => view! { <p>{NO_RECOMMENDATIONS_MESSAGE}</p> }.into_view(),
                RecommendationSection::Rows(rows) => rows
                    .into_iter()
                    .map(|row| view! { <RecommendationCard row=row disclosure=disclosure/> })
                    .collect_view(),
            }}
        </div>
    }
}

#[component]
fn RecommendationCard(row: RecommendationRow, disclosure: RwSignal<DisclosureTracker>) -> impl IntoView {
    let RecommendationRow {
        id,
        href,
        title,
        category,
        price,
        score,
        image,
        show_toggle,
        toggle_label,
        explanation,
    } = row;
    let image = image_view(image, title.clone());

    let toggle = show_toggle.then(|| {
        view! {
            <button
                class="explain-btn"
                on:click=move |_| disclosure.update(|d| {
                    d.toggle(id);
                })
            >
                {toggle_label}
            </button>
        }
    });

    view! {
        <div class="rec-card-wrapper">
            <A href=href>
                <div class="rec-card">
                    <div class="rec-image">{image}</div>
                    <div class="rec-info">
                        <h4>{title}</h4>
                        <p class="category">{category}</p>
                        <p class="price">{price}</p>
                        <p class="score"><strong>"Score: "</strong>{score}</p>
                    </div>
                </div>
            </A>
            {toggle}
            {explanation.map(|text| view! { <p class="explanation">{text}</p> })}
        </div>
    }
}
