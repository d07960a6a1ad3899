//! RocketShoes CLI - Manage the local shopping cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with subtotals
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to two units
//! rs-cart update 3 2
//!
//! # Drop product 3 from the cart
//! rs-cart remove 3
//! ```
//!
//! # Environment Variables
//!
//! - `CART_API_URL` - Catalog service base URL
//! - `CART_STORAGE_PATH` - File the cart is persisted to
//! - `RUST_LOG` - Log filter (default: `rocketshoes_cart=info,rocketshoes_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rocketshoes_cart::{ApiClient, CartConfig, CartStore, FileStorage, TracingNotifier};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: i32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: i32,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        id: i32,

        /// New quantity (zero or less is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i32,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rocketshoes_cli=info,rocketshoes=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let store = CartStore::new(
        ApiClient::new(&config),
        FileStorage::new(&config.storage_path),
        TracingNotifier,
    );

    match cli.command {
        Commands::Show => {}
        Commands::Add { id } => commands::cart::add(&store, id).await,
        Commands::Remove { id } => commands::cart::remove(&store, id),
        Commands::Update { id, amount } => commands::cart::update(&store, id, amount).await,
    }

    commands::cart::print(&store.cart());
    Ok(())
}
