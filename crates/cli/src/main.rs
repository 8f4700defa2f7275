//! Nutrijoseph CLI - Terminal front end for the session cart.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (repeat to increase quantity)
//! cart-cli add --id p1 --name "Whey Gold" --price 189.90 --image img/whey.jpg
//!
//! # Show the cart, as text or JSON
//! cart-cli list
//! cart-cli --json list
//!
//! # Remove a product, pay, or start over
//! cart-cli remove p1
//! cart-cli checkout
//! cart-cli clear
//! ```
//!
//! # Environment
//!
//! Reads `CART_STORAGE_KEY`, `CART_DATA_DIR` and `CART_CURRENCY` (see
//! `nutrijoseph_cart::config`). `RUST_LOG` controls log filtering and
//! `CART_LOG_FORMAT=json` switches logs to JSON. Logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use nutrijoseph_cart::CartConfig;
use nutrijoseph_cart::storage::FileStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Nutrijoseph shopping cart")]
struct Cli {
    /// Print output as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product display name
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 49.90
        #[arg(long)]
        price: String,

        /// Image reference
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Show the cart contents
    List,
    /// Show item count and total price
    Totals,
    /// Pay for the cart and empty it
    Checkout,
    /// Empty the cart and delete its saved data
    Reset,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nutrijoseph_cli=info,nutrijoseph_cart=info".into());
    let json = std::env::var("CART_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let mut session = commands::cart::Session::open(FileStore::new(&config.data_dir), &config);
    let format = if cli.json {
        commands::cart::Format::Json
    } else {
        commands::cart::Format::Text
    };
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Add {
            id,
            name,
            price,
            image,
        } => session.add(&mut out, &id, &name, &price, &image)?,
        Commands::Remove { id } => session.remove(&mut out, &id)?,
        Commands::Clear => session.clear(&mut out)?,
        Commands::List => session.list(&mut out, format)?,
        Commands::Totals => session.totals(&mut out, format)?,
        Commands::Checkout => session.checkout(&mut out, format)?,
        Commands::Reset => session.reset(&mut out)?,
    }
    Ok(())
}
