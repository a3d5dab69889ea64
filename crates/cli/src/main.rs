//! Pocket Cart CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! pc-cli catalog
//!
//! # Show the cart
//! pc-cli cart show
//!
//! # Add one unit of product 1, then bump it by two more
//! pc-cli cart add 1
//! pc-cli cart update 1 2
//!
//! # Remove a line or empty the cart
//! pc-cli cart remove 1
//! pc-cli cart clear
//!
//! # Check out (clears the cart when both fields are given)
//! pc-cli checkout --name "Asha" --email asha@example.com
//! ```
//!
//! The CLI reads the same `STOREFRONT_*` variables as the server, so it
//! edits the cart the storefront serves.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(author, version, about = "Pocket Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog,
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the checkout form
    Checkout {
        /// Customer name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Customer email
        #[arg(short, long, default_value = "")]
        email: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Catalog product id
        product_id: i32,
    },
    /// Change a line's quantity by a signed amount
    Update {
        /// Catalog product id
        product_id: i32,

        /// Amount to add (negative to decrease)
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Remove a line
    Remove {
        /// Catalog product id
        product_id: i32,
    },
    /// Empty the cart
    Clear,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::from_env()?;

    match cli.command {
        Commands::Catalog => commands::catalog::list(&ctx),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { product_id } => {
                commands::cart::add(&mut ctx, product_id)?;
            }
            CartAction::Update { product_id, delta } => {
                commands::cart::update(&mut ctx, product_id, delta)?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&mut ctx, product_id)?;
            }
            CartAction::Clear => commands::cart::clear(&mut ctx)?,
        },
        Commands::Checkout { name, email } => {
            commands::checkout::submit(&mut ctx, name, email)?;
        }
    }
    Ok(())
}
