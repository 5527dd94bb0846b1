//! Dropship CLI - browse the catalog, keep a cart, and check out.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! dropship products --page 2 --size 10
//! dropship product 42
//!
//! # Cart (persists in the profile directory between runs)
//! dropship cart add 42
//! dropship cart set 42 3
//! dropship cart show
//!
//! # Check out
//! dropship checkout --email me@example.com --address "1 Main St" --name "Me"
//! dropship pay
//! dropship order 17
//! ```
//!
//! # Environment Variables
//!
//! - `COMMERCE_API_BASE_URL`, `COMMERCE_API_TOKEN`, `STOREFRONT_CURRENCY` -
//!   see the storefront configuration
//! - `DROPSHIP_PROFILE_DIR` - Cart directory (default: `$HOME/.dropship`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "dropship")]
#[command(author, version, about = "Dropship storefront CLI")]
struct Cli {
    /// Directory holding the cart (overrides `DROPSHIP_PROFILE_DIR`)
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Products per page
        #[arg(short, long, default_value_t = 20)]
        size: u32,
    },
    /// Show one product
    Product {
        /// Product ID
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart
    Checkout {
        /// Contact email
        #[arg(short, long)]
        email: String,

        /// Shipping address
        #[arg(short, long)]
        address: String,

        /// Buyer name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Start a hosted payment for the cart
    Pay,
    /// Show an order
    Order {
        /// Order ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line's quantity (0 removes it)
    Set {
        /// Product ID
        id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropship_cli=info,dropship_cart=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let profile_dir = cli.profile_dir;
    let profile = move || commands::Profile::resolve(profile_dir.clone());

    let text = match cli.command {
        Commands::Products { page, size } => commands::catalog::products(page, size).await?,
        Commands::Product { id } => commands::catalog::product(&id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&profile()?)?,
            CartAction::Add { id } => commands::cart::add(&profile()?, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(&profile()?, &id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set(&profile()?, &id, quantity)?
            }
            CartAction::Clear => commands::cart::clear(&profile()?)?,
        },
        Commands::Checkout {
            email,
            address,
            name,
        } => commands::checkout::place_order(&profile()?, email, address, name).await?,
        Commands::Pay => commands::checkout::pay(&profile()?).await?,
        Commands::Order { id } => commands::checkout::order(id).await?,
    };

    output::emit(&text);
    Ok(())
}
