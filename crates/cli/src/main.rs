//! Shopfront CLI - the storefront's pages from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopfront products --page 2 --category 甜甜圈
//! shopfront product -L9tH8jxVb2Ka_DYPwng
//!
//! # Work with the cart
//! shopfront cart show
//! shopfront cart add -L9tH8jxVb2Ka_DYPwng --qty 2
//! shopfront cart qty <item-id> <product-id> 3
//! shopfront cart remove <item-id>
//! shopfront cart clear
//!
//! # Check out
//! shopfront order --email a@b.com --name 王小明 --tel 0912345678 --address 台北市
//! ```
//!
//! Reads the same `SHOPFRONT_API_*` variables as the storefront server.
//! Exits non-zero when the remote API reported a failure or the input was
//! rejected.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shopfront_storefront::api::CommerceClient;
use shopfront_storefront::config::CommerceApiConfig;

mod commands;
mod output;

use commands::CliError;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Product {
        /// Product id
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Order {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        tel: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product id
        #[arg(allow_hyphen_values = true)]
        product_id: String,

        /// Units to add (1-10)
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Set the quantity of a line
    Qty {
        /// Cart line id
        #[arg(allow_hyphen_values = true)]
        item_id: String,

        /// Product id of the line
        #[arg(allow_hyphen_values = true)]
        product_id: String,

        /// New quantity (at least 1)
        qty: u32,
    },
    /// Remove a line
    Remove {
        /// Cart line id
        #[arg(allow_hyphen_values = true)]
        item_id: String,
    },
    /// Remove every line
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(cli, &mut out).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            report_failure(&mut out, &e);
            ExitCode::FAILURE
        }
    }
}

/// Log a command failure and tell the user, as far as the terminal allows.
fn report_failure(out: &mut impl Write, err: &CliError) {
    tracing::error!("Command failed: {err}");
    if let Err(write_err) = writeln!(out, "錯誤：{err}") {
        tracing::warn!(error = %write_err, "Failed to write error message");
    }
}

/// Run a command. `Ok(false)` means it ran but raised an error notice.
async fn run(cli: Cli, out: &mut impl Write) -> Result<bool, CliError> {
    dotenvy::dotenv().ok();
    let api = CommerceClient::new(&CommerceApiConfig::from_env()?);

    let notices = match cli.command {
        Commands::Products { page, category } => {
            commands::catalog::products(&api, page, category.as_deref(), out).await?
        }
        Commands::Product { id } => commands::catalog::product(&api, &id, out).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&api, out).await?,
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&api, &product_id, qty).await
            }
            CartAction::Qty {
                item_id,
                product_id,
                qty,
            } => commands::cart::set_qty(&api, &item_id, &product_id, qty, out).await?,
            CartAction::Remove { item_id } => commands::cart::remove(&api, &item_id, out).await?,
            CartAction::Clear => commands::cart::clear(&api, out).await?,
        },
        Commands::Order {
            email,
            name,
            tel,
            address,
            message,
        } => {
            let form = shopfront_core::OrderForm {
                email,
                name,
                tel,
                address,
                message,
            };
            commands::order::place(&api, &form, out).await?
        }
    };

    output::notices(out, &notices)?;
    Ok(!notices.has_errors())
}
