//! Command-line front end.
//!
//! Each subcommand drives the same operations a storefront screen would:
//! paginated listings through [`ListController`], detail lookups through
//! [`CatalogClient`], favorites through [`WishlistStore`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use crate::api::{CatalogClient, ItemId, Product, ProductQuery};
use crate::catalog::{
    CategoryPages, ListController, LoadOutcome, PageSource, ProductPages, TrendingPages,
};
use crate::config::Config;
use crate::wishlist::{FileKeyValueStore, WishlistStore};

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Browse the storefront catalog")]
pub struct Cli {
    /// Path to config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the page size used to detect the last page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Override the directory holding the wishlist
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products, optionally filtered
    Products(ProductsArgs),
    /// List trending products
    Trending,
    /// List categories
    Categories,
    /// Show one product
    Product {
        /// Product id
        id: ItemId,
    },
    /// Show store links (about, policies, contact)
    Settings,
    /// Manage the wishlist
    #[command(subcommand)]
    Wishlist(WishlistCommand),
}

#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Free-text search
    #[arg(long, short)]
    pub search: Option<String>,

    /// Category id filter
    #[arg(long, short)]
    pub category: Option<ItemId>,

    /// Number of pages to fetch
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

impl ProductsArgs {
    pub fn query(&self) -> ProductQuery {
        ProductQuery {
            search: None,
            category_id: self.category.clone(),
        }
        .with_search(self.search.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// Show saved products, most recent first
    List,
    /// Save a product if not saved yet
    Add { id: ItemId },
    /// Save or unsave a product
    Toggle { id: ItemId },
    /// Unsave a product
    Remove { id: ItemId },
    /// Unsave everything
    Clear,
}

/// Resolve configuration: file, then command-line overrides.
///
/// The merged result is validated again, so an override can't smuggle in
/// a value the file loader would reject.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path)?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.catalog.page_size = page_size;
    }
    if let Some(dir) = &cli.storage_dir {
        config.storage.dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let client = CatalogClient::new(&config.api)?;
    let page_size = config.catalog.page_size;

    match cli.command {
        Command::Products(args) => {
            let wishlist = open_wishlist(&config).await;
            let controller = ListController::with_page_size(ProductPages::new(client), page_size);
            let products = collect_pages(&controller, args.query(), args.pages).await?;
            for product in &products {
                println!("{}", product_line(product, wishlist.is_member(&product.id)));
            }
            print_footer(&controller);
        }
        Command::Trending => {
            let wishlist = open_wishlist(&config).await;
            let controller = ListController::with_page_size(TrendingPages::new(client), page_size);
            for product in &collect_pages(&controller, (), 1).await? {
                println!("{}", product_line(product, wishlist.is_member(&product.id)));
            }
        }
        Command::Categories => {
            let controller = ListController::with_page_size(CategoryPages::new(client), page_size);
            for category in &collect_pages(&controller, (), 1).await? {
                println!("{}\t{}", category.id, category.name.as_deref().unwrap_or("?"));
            }
        }
        Command::Product { id } => {
            let wishlist = open_wishlist(&config).await;
            let product = client.product(&id).await?;
            print_product(&product, wishlist.is_member(&product.id));
        }
        Command::Settings => {
            let settings = client.app_settings().await?;
            let links = settings.links();
            if links.is_empty() {
                println!("No links available.");
            }
            for link in links {
                println!("{}\t{}", link.title, link.url);
            }
        }
        Command::Wishlist(command) => {
            let wishlist = open_wishlist(&config).await;
            run_wishlist(command, &wishlist, &client).await?;
            wishlist.flush().await;
        }
    }

    Ok(())
}

async fn run_wishlist(
    command: WishlistCommand,
    wishlist: &WishlistStore,
    client: &CatalogClient,
) -> anyhow::Result<()> {
    match command {
        WishlistCommand::List => {
            if wishlist.is_empty() {
                println!("Wishlist is empty.");
            }
            for product in wishlist.items() {
                println!("{}", product_line(&product, true));
            }
        }
        WishlistCommand::Add { id } => {
            let product = client
                .product(&id)
                .await
                .with_context(|| format!("Cannot add product {}", id))?;
            if wishlist.add(product) {
                println!("Added {} to wishlist.", id);
            } else {
                println!("Product {} is already in the wishlist.", id);
            }
        }
        WishlistCommand::Toggle { id } => {
            let product = if wishlist.is_member(&id) {
                // Removal only needs the id; skip the network round-trip.
                Product::new(id.clone(), "")
            } else {
                client
                    .product(&id)
                    .await
                    .with_context(|| format!("Cannot add product {}", id))?
            };
            if wishlist.toggle(product) {
                println!("Added {} to wishlist.", id);
            } else {
                println!("Removed {} from wishlist.", id);
            }
        }
        WishlistCommand::Remove { id } => {
            if wishlist.remove(&id) {
                println!("Removed {} from wishlist.", id);
            } else {
                println!("Product {} is not in the wishlist.", id);
            }
        }
        WishlistCommand::Clear => {
            wishlist.clear();
            println!("Wishlist cleared.");
        }
    }
    Ok(())
}

async fn open_wishlist(config: &Config) -> WishlistStore {
    let storage = FileKeyValueStore::new(config.storage.resolved_dir());
    WishlistStore::initialize(Arc::new(storage)).await
}

/// Load the first page and up to `pages - 1` further pages.
///
/// A failed first page is an error; a failed later page stops paging and
/// keeps what was loaded.
async fn collect_pages<S: PageSource>(
    controller: &ListController<S>,
    query: S::Query,
    pages: u32,
) -> anyhow::Result<Vec<S::Item>> {
    if let LoadOutcome::Failed { message } = controller.load_first_page(query).await {
        bail!(message);
    }

    for _ in 1..pages {
        match controller.load_next_page().await {
            LoadOutcome::Loaded { .. } => continue,
            LoadOutcome::Failed { message } => {
                eprintln!("Warning: stopped paging: {}", message);
                break;
            }
            LoadOutcome::Empty | LoadOutcome::Skipped | LoadOutcome::Stale => break,
        }
    }

    Ok(controller.read(|state| state.items.clone()))
}

fn print_footer<S: PageSource>(controller: &ListController<S>) {
    let (count, has_more, next_page, empty) =
        controller.read(|s| (s.len(), s.has_more, s.next_page, s.is_empty_result()));
    if empty {
        println!("No products found.");
    } else if has_more {
        println!("-- {} items, more from page {} --", count, next_page);
    } else {
        println!("-- {} items, end of list --", count);
    }
}

fn product_line(product: &Product, saved: bool) -> String {
    let marker = if saved { "*" } else { " " };
    let price = product
        .display_price()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{} {}\t{}\t{}", marker, product.id, product.display_name(), price)
}

fn print_product(product: &Product, saved: bool) {
    println!("{}{}", product.display_name(), if saved { " (in wishlist)" } else { "" });
    println!("id: {}", product.id);
    if let Some(price) = &product.price {
        println!("price: {}", price);
    }
    if let Some(discount) = &product.discount_price {
        println!("discount price: {}", discount);
    }
    if let Some(category) = &product.category_name {
        println!("category: {}", category);
    }
    match product.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(description) => println!("\n{}\n", description),
        None => println!("\nNo description available.\n"),
    }
    match product.buy_url() {
        Some(url) => println!("buy: {}", url),
        None => println!("Buy link not available."),
    }
}
