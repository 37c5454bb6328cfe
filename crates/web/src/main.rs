//! Headless storefront client: the same state and render models as the
//! browser frontend, printed to stdout.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use storefront_client::{ClientConfig, HttpCatalogApi};
#[cfg(feature = "cli")]
use storefront_core::ProductId;
#[cfg(feature = "cli")]
use storefront_web::view::{
    CatalogGrid, ProductCardView, ProductSection, RecommendationSection, catalog_grid, category_buttons,
    product_section, recommendation_section,
};
#[cfg(feature = "cli")]
use storefront_web::{CatalogState, DetailPhase, DisclosureTracker, ProductDetailResolver};

#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Browse the catalog and its recommendations")]
struct Cli {
    /// Base address of the recommendation service [default: $STOREFRONT_API_URL or
    /// http://127.0.0.1:8000]
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Subcommand)]
enum Command {
    /// List the category filter set
    Categories,
    /// List products, optionally narrowed to one category
    Products {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a product and its recommendations
    Show {
        id: String,
        /// Expand every available explanation
        #[arg(long)]
        explain: bool,
    },
}

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    storefront_observability::init();

    let cli = Cli::parse();
    let config = cli.api_url.map(ClientConfig::new).unwrap_or_else(ClientConfig::from_env);
    let api = HttpCatalogApi::new(config);
    tracing::info!(api_url = api.config().api_url(), "storefront client starting");

    let mut catalog = CatalogState::new();

    match cli.command {
        Command::Categories => {
            catalog.load(&api).await;
            fail_on_catalog_error(&catalog)?;
            for button in category_buttons(&catalog) {
                println!("{}", button.label);
            }
        }
        Command::Products { category } => {
            catalog.load(&api).await;
            fail_on_catalog_error(&catalog)?;
            if let Some(category) = category {
                catalog.set_active_category(category);
            }
            match catalog_grid(&catalog) {
                CatalogGrid::Cards(cards) => cards.iter().for_each(print_card),
                CatalogGrid::Empty => println!("{}", storefront_web::view::EMPTY_CATEGORY_MESSAGE),
                CatalogGrid::Loading | CatalogGrid::Failed(_) => {}
            }
        }
        Command::Show { id, explain } => {
            let mut resolver = ProductDetailResolver::new();
            match id.parse::<ProductId>() {
                Ok(product_id) => {
                    resolver.resolve(&api, &mut catalog, product_id).await;
                }
                Err(_) => {
                    resolver.select(&id);
                }
            }

            let mut disclosure = DisclosureTracker::new();
            if let Some(token) = resolver.current_token() {
                disclosure.rescope(token);
            }
            if explain {
                for rec in resolver.recommendations().value().into_iter().flatten() {
                    if rec.has_explanation() {
                        disclosure.toggle(rec.id);
                    }
                }
            }

            print_detail(&resolver, &disclosure);

            if resolver.phase() == DetailPhase::Failed {
                anyhow::bail!("could not load product {id}");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn fail_on_catalog_error(catalog: &CatalogState) -> Result<()> {
    match catalog.error() {
        Some(err) => Err(err.clone()).context("failed to load catalog"),
        None => Ok(()),
    }
}

#[cfg(feature = "cli")]
fn print_card(card: &ProductCardView) {
    println!("[{}] {} ({}) {}", card.id, card.title, card.category, card.price);
}

#[cfg(feature = "cli")]
fn print_detail(resolver: &ProductDetailResolver, disclosure: &DisclosureTracker) {
    match product_section(resolver) {
        ProductSection::Found(card) => {
            print_card(&card);
            if !card.description.is_empty() {
                println!("    {}", card.description);
            }
        }
        ProductSection::NotFound => println!("{}", storefront_web::view::PRODUCT_NOT_FOUND_MESSAGE),
        ProductSection::Failed(message) => println!("{message}"),
        ProductSection::Loading => {}
    }

    println!();
    println!("Recommended Products");
    match recommendation_section(resolver, disclosure) {
        RecommendationSection::Rows(rows) => {
            for row in rows {
                println!(
                    "  [{}] {} ({}) {} score {}",
                    row.id, row.title, row.category, row.price, row.score
                );
                if let Some(explanation) = row.explanation {
                    println!("      {explanation}");
                }
            }
        }
        RecommendationSection::Empty => println!("  {}", storefront_web::view::NO_RECOMMENDATIONS_MESSAGE),
        RecommendationSection::NotFound => println!("  {}", storefront_web::view::PRODUCT_NOT_FOUND_MESSAGE),
        RecommendationSection::Failed(message) => println!("  {message}"),
        RecommendationSection::Loading => {}
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature to be enabled.");
    eprintln!("Build with: cargo build -p storefront-web --features cli");
    std::process::exit(1);
}
