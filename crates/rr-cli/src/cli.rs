use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rr_types::{RoastLevel, SortMode};

#[derive(Parser)]
#[command(
    name = "rr",
    about = "Roast & Ritual storefront: catalog, cart, brew timer and preferences",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the persisted cart, theme and subscribers
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to ./rr.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List products, optionally filtered and sorted
    Catalog(CatalogArgs),
    /// Show or change the cart
    Cart(CartArgs),
    /// Run the brew timer in the foreground
    Brew(BrewArgs),
    /// Show, set or toggle the colour theme
    Theme(ThemeArgs),
    /// Join the newsletter
    Subscribe(SubscribeArgs),
    /// List stored keys, or wipe the storefront's saved state
    Data(DataArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Case-insensitive match on name or description
    #[arg(short, long, default_value = "")]
    pub query: String,
    /// featured, price_asc, price_desc or new
    #[arg(short, long)]
    pub sort: Option<SortMode>,
}

#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub action: Option<CartAction>,
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart (default)
    Show,
    /// Add one unit of a catalog product
    Add { id: String },
    /// Increase an item's quantity by one
    Inc { id: String },
    /// Decrease an item's quantity by one, removing it at zero
    Dec { id: String },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
pub struct BrewArgs {
    /// light, medium or dark (defaults to the configured roast)
    #[arg(short, long)]
    pub roast: Option<RoastLevel>,
    /// Real milliseconds per brew second
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

#[derive(Args)]
pub struct ThemeArgs {
    pub choice: Option<ThemeChoice>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

#[derive(Args)]
pub struct DataArgs {
    /// Remove the saved cart, theme and subscriber list
    #[arg(long)]
    pub wipe: bool,
}

#[derive(Args)]
pub struct SubscribeArgs {
    pub email: String,
}
