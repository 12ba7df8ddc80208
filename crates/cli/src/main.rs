//! Shopfront CLI - browse the catalog, manage the cart, edit products.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shopfront catalog
//! shopfront catalog --search shirt
//! shopfront catalog --tag 新品
//!
//! # Log in, then use the cart
//! shopfront login --token abc123
//! shopfront cart add p-1
//! shopfront cart qty p-1 3
//! shopfront cart checkout
//!
//! # Admin editor
//! shopfront admin list
//! shopfront admin create --product-id p-9 --name "Red Shirt" --price 19.99 \
//!     --stock 5 --image https://img.example/shirt.png --description Cotton --tags "服飾, 新品"
//! shopfront admin edit 0 --price 17.50
//! shopfront admin delete p-9 --yes
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_API_BASE_URL` - Product Store base URL
//! - `SHOPFRONT_API_SCHEMA` - `backend` or `fakestore`
//! - `SHOPFRONT_DATA_DIR` - Directory holding the local storage file
//! - `SENTRY_DSN` - Optional Sentry DSN

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use shopfront::config::StorefrontConfig;
use shopfront::{Storefront, StorefrontError};
use shopfront_core::{ProductId, Quantity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog, optionally filtered
    Catalog {
        /// Show products whose name contains this text
        #[arg(short, long, conflicts_with = "tag")]
        search: Option<String>,

        /// Show products carrying this tag (`all` shows everything)
        #[arg(short, long)]
        tag: Option<String>,

        /// List the quick filter tags instead of products
        #[arg(long, conflicts_with_all = ["search", "tag"])]
        tags: bool,
    },
    /// Product detail
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the cart (requires login)
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Start a session
    Login(LoginArgs),
    /// End the session
    Logout,
    /// Create, edit and delete products (requires login)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Open a catalog product in the detail view
    Show { id: ProductId },
    /// Show the product last opened
    Last,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its subtotal
    Show,
    /// Add a catalog product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
    /// Set the quantity of a product already in the cart
    Qty {
        id: ProductId,
        #[arg(value_parser = parse_quantity)]
        quantity: Quantity,
    },
    /// Empty the cart
    Clear,
    /// Purchase everything in the cart
    Checkout,
}

#[derive(Args)]
struct LoginArgs {
    /// Use a token issued elsewhere
    #[arg(long, conflicts_with_all = ["username", "password"])]
    token: Option<String>,

    /// Log in at the Product Store with credentials
    #[arg(short, long, requires = "password")]
    username: Option<String>,

    #[arg(short, long)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List product records
    List,
    /// Create a product
    Create(FormArgs),
    /// Edit the record at a list position
    Edit {
        /// Position in `admin list`
        index: usize,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a product
    Delete {
        id: ProductId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Editor fields; unset fields keep their current value.
#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    product_id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    stock: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,
    /// RFC 3339 timestamp; defaults to now for new products
    #[arg(long)]
    launch_date: Option<String>,
}

fn parse_quantity(s: &str) -> Result<Quantity, String> {
    let n: u32 = s.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    Quantity::new(n).map_err(|e| e.to_string())
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            output::notice(&StorefrontError::from(e).notice());
            return ExitCode::from(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so they never mix with command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut store = match Storefront::open(config) {
        Ok(store) => store,
        Err(e) => {
            output::notice(&e.notice());
            return ExitCode::from(2);
        }
    };

    match run(cli, &mut store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::notice(&e.notice());
            if e.redirects_to_login() {
                output::login_hint();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, store: &mut Storefront) -> Result<(), StorefrontError> {
    match cli.command {
        Commands::Catalog { search, tag, tags } => {
            if tags {
                commands::catalog::tags();
            } else {
                commands::catalog::list(store, search.as_deref(), tag.as_deref()).await?;
            }
        }
        Commands::Product { action } => match action {
            ProductAction::Show { id } => commands::catalog::show(store, &id).await?,
            ProductAction::Last => commands::catalog::last(store)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(store)?,
            CartAction::Add { id } => commands::cart::add(store, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(store, &id)?,
            CartAction::Qty { id, quantity } => commands::cart::set_quantity(store, &id, quantity)?,
            CartAction::Clear => commands::cart::clear(store)?,
            CartAction::Checkout => commands::cart::checkout(store)?,
        },
        Commands::Login(args) => match (args.token, args.username, args.password) {
            (Some(token), _, _) => commands::session::login_with_token(store, SecretString::from(token))?,
            (None, Some(username), Some(password)) => {
                commands::session::login(store, &username, &SecretString::from(password)).await?;
            }
            _ => {
                return Err(StorefrontError::BadRequest(
                    "pass --token, or --username with --password".to_string(),
                ));
            }
        },
        Commands::Logout => commands::session::logout(store),
        Commands::Admin { action } => match action {
            AdminAction::List => commands::admin::list(store).await?,
            AdminAction::Create(form) => commands::admin::create(store, form.into()).await?,
            AdminAction::Edit { index, form } => commands::admin::edit(store, index, form.into()).await?,
            AdminAction::Delete { id, yes } => commands::admin::delete(store, &id, yes).await?,
        },
    }
    Ok(())
}

impl From<FormArgs> for commands::admin::FormPatch {
    fn from(args: FormArgs) -> Self {
        Self {
            product_id: args.product_id,
            name: args.name,
            price: args.price,
            stock: args.stock,
            image: args.image,
            description: args.description,
            tags: args.tags,
            launch_date: args.launch_date,
        }
    }
}
