//! Acadshop cart CLI - drive the cart API and inspect the cart surfaces.
//!
//! # Usage
//!
//! ```bash
//! # Show the badge, side cart and sidebar for the current session
//! acadshop-cart show
//!
//! # Add a product through the product page's form action (quantity is
//! # clamped like the product page input)
//! acadshop-cart add --action /carrinho/adicionar -p 42 -q 2 --size M --color Azul
//!
//! # Change a line's quantity (0 or less removes it)
//! acadshop-cart update -i 7 -q 3
//!
//! # Remove a line
//! acadshop-cart remove -i 7
//!
//! # Replay a click on a rendered control
//! acadshop-cart click update --item 7 --quantity 2
//! ```
//!
//! # Environment Variables
//!
//! - `ACADSHOP_BASE_URL` - storefront origin serving `/api/cart`
//! - `ACADSHOP_SESSION_COOKIE` - session cookie identifying the cart
//! - `ACADSHOP_LOG_FORMAT` - `pretty` or `json`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "acadshop-cart")]
#[command(author, version, about = "Acadshop cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the cart and print every surface
    Show,
    /// Open the side cart quick view and print it
    SideCart,
    /// Submit the add-to-cart form
    Add {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Quantity as typed; clamped to 1..=999
        #[arg(short, long, default_value = "1")]
        quantity: String,

        /// Selected size
        #[arg(long)]
        size: Option<String>,

        /// Selected color
        #[arg(long)]
        color: Option<String>,

        /// Form action the product page posts to (copied from its `<form>`)
        #[arg(long)]
        action: String,
    },
    /// Set a line's quantity
    Update {
        /// Cart line ID
        #[arg(short, long)]
        item: String,

        /// New quantity
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Cart line ID
        #[arg(short, long)]
        item: String,
    },
    /// Replay a click on a control rendered in a cart panel
    Click {
        /// Value of `data-cart-action`
        action: String,

        /// Value of `data-item-id`
        #[arg(long)]
        item: Option<String>,

        /// Value of `data-quantity`
        #[arg(long, allow_negative_numbers = true)]
        quantity: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let config = match acadshop_storefront::config::CartClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Configuration error: {e}");
            }
            std::process::exit(2);
        }
    };

    let _sentry_guard = acadshop_storefront::telemetry::init(&config);

    let cli = Cli::parse();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(
    cli: Cli,
    config: acadshop_storefront::config::CartClientConfig,
) -> Result<(), commands::CommandError> {
    let session = commands::Session::new(&config);

    match cli.command {
        Commands::Show => session.show().await,
        Commands::SideCart => session.side_cart().await?,
        Commands::Add {
            product,
            quantity,
            size,
            color,
            action,
        } => {
            session
                .add(&action, &product, &quantity, size, color)
                .await?;
        }
        Commands::Update { item, quantity } => session.update(&item, quantity).await?,
        Commands::Remove { item } => session.remove(&item).await?,
        Commands::Click {
            action,
            item,
            quantity,
        } => {
            session
                .click(&action, item.as_deref(), quantity.as_deref())
                .await?;
        }
    }
    Ok(())
}
