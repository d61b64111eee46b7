use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;

use rr_app::{Action, LiveStorefront, StorefrontConfig, Update, View};
use rr_store::KvStore;
use rr_types::keys;

use crate::cli::*;
use crate::view::TerminalView;

const DEFAULT_CONFIG: &str = "rr.toml";
const DEFAULT_DATA_DIR: &str = ".rr";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let mut view = TerminalView::new(cli.format);

    match cli.command {
        Command::Catalog(args) => cmd_catalog(&config, &mut view, args),
        Command::Cart(args) => cmd_cart(&config, &mut view, args),
        Command::Brew(args) => cmd_brew(config, &mut view, args),
        Command::Theme(args) => cmd_theme(&config, &mut view, args),
        Command::Subscribe(args) => {
            let mut sf = open(&config)?;
            apply(&mut sf, &mut view, Action::Subscribe { email: args.email })
        }
        Command::Data(args) => cmd_data(&config, cli.format, args),
        Command::Config => cmd_config(&config, cli.format),
    }
}

/// Config file (explicit, or `rr.toml` when present) with `--data-dir`
/// applied on top. Without either, data lives in `./.rr`.
fn resolve_config(cli: &Cli) -> anyhow::Result<StorefrontConfig> {
    let mut config = match &cli.config {
        Some(path) => StorefrontConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            StorefrontConfig::load(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("loading config {DEFAULT_CONFIG}"))?
        }
        None => StorefrontConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if config.data_dir.is_none() {
        config.data_dir = Some(PathBuf::from(DEFAULT_DATA_DIR));
    }
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn open(config: &StorefrontConfig) -> anyhow::Result<LiveStorefront> {
    let store = config.open_store();
    let catalog = config.load_catalog().context("loading catalog")?;
    let (sf, _tx, _rx) = LiveStorefront::with_channel(config, store, catalog);
    Ok(sf)
}

/// Dispatch one action and render the result. A rejected action is an error.
fn apply(
    sf: &mut LiveStorefront,
    view: &mut TerminalView,
    action: Action,
) -> anyhow::Result<()> {
    let update = sf.dispatch(action);
    if sf.poll_storage_degraded() {
        let _ = view.render(&Update::StorageDegraded);
    }
    if let Update::Rejected(reason) = update {
        bail!(reason);
    }
    let _ = view.render(&update);
    Ok(())
}

fn cmd_catalog(
    config: &StorefrontConfig,
    view: &mut TerminalView,
    args: CatalogArgs,
) -> anyhow::Result<()> {
    let mut sf = open(config)?;
    if let Some(mode) = args.sort {
        sf.dispatch(Action::Sort { mode });
    }
    apply(&mut sf, view, Action::Search { query: args.query })
}

fn cmd_cart(
    config: &StorefrontConfig,
    view: &mut TerminalView,
    args: CartArgs,
) -> anyhow::Result<()> {
    let mut sf = open(config)?;
    let action = match args.action.unwrap_or(CartAction::Show) {
        CartAction::Show => {
            let _ = view.render(&Update::Cart(sf.cart_view()));
            return Ok(());
        }
        CartAction::Add { id } => match sf.product(&id) {
            Some(product) => Action::add_product(product),
            None => bail!("no product with id {id:?}"),
        },
        CartAction::Inc { id } => {
            ensure_in_cart(&sf, &id)?;
            Action::IncrementItem { id }
        }
        CartAction::Dec { id } => {
            ensure_in_cart(&sf, &id)?;
            Action::DecrementItem { id }
        }
        CartAction::Clear => Action::ClearCart,
    };
    apply(&mut sf, view, action)
}

fn ensure_in_cart(sf: &LiveStorefront, id: &str) -> anyhow::Result<()> {
    if !sf.cart().ledger().contains(id) {
        bail!("{id:?} is not in the cart");
    }
    Ok(())
}

fn cmd_theme(
    config: &StorefrontConfig,
    view: &mut TerminalView,
    args: ThemeArgs,
) -> anyhow::Result<()> {
    let mut sf = open(config)?;
    let action = match args.choice {
        None => {
            let _ = view.render(&Update::Theme(sf.theme()));
            return Ok(());
        }
        Some(ThemeChoice::Toggle) => Action::ToggleTheme,
        Some(ThemeChoice::Light) => Action::SetTheme(rr_types::Theme::Light),
        Some(ThemeChoice::Dark) => Action::SetTheme(rr_types::Theme::Dark),
    };
    apply(&mut sf, view, action)
}

fn cmd_brew(
    mut config: StorefrontConfig,
    view: &mut TerminalView,
    args: BrewArgs,
) -> anyhow::Result<()> {
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }
    if let Some(level) = args.roast {
        config.default_roast = level;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting runtime")?;

    runtime.block_on(async {
        let store = config.open_store();
        let catalog = config.load_catalog().context("loading catalog")?;
        let (mut sf, _tx, mut rx) = LiveStorefront::with_channel(&config, store, catalog);

        let started = sf.dispatch(Action::StartBrew);
        if view.render(&started).is_break() {
            return Ok(());
        }

        tokio::select! {
            summary = rr_app::run(&mut sf, &mut rx, view) => {
                debug!(ticks = summary.processed, "brew finished");
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("waiting for ctrl-c")?;
                let _ = view.render(&sf.dispatch(Action::ResetBrew));
                println!();
                println!("{}", "Brew cancelled.".yellow());
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

/// Stored keys with their value sizes in bytes.
fn stored_keys(store: &KvStore) -> Vec<(String, usize)> {
    store
        .keys()
        .into_iter()
        .filter_map(|key| {
            let len = store.get(&key)?.len();
            Some((key, len))
        })
        .collect()
}

/// Remove every storefront key. Returns how many held a value.
fn wipe(store: &KvStore) -> usize {
    let present = store.keys();
    let mut removed = 0;
    for key in keys::ALL {
        if present.iter().any(|k| k == key) {
            removed += 1;
        }
        store.remove(key);
    }
    removed
}

fn cmd_data(config: &StorefrontConfig, format: OutputFormat, args: DataArgs) -> anyhow::Result<()> {
    let store = config.open_store();
    if args.wipe {
        let removed = wipe(&store);
        if store.is_memory_only() {
            bail!("storage unavailable; nothing was removed");
        }
        match format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "removed": removed })),
            OutputFormat::Text => {
                println!("{} Removed {removed} saved key(s)", "✓".green().bold())
            }
        }
        return Ok(());
    }

    let entries = stored_keys(&store);
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = entries
                .iter()
                .map(|(key, len)| serde_json::json!({ "key": key, "bytes": len }))
                .collect();
            let listing = serde_json::json!({ "backend": store.backend_name(), "keys": entries });
            println!("{listing}");
        }
        OutputFormat::Text if entries.is_empty() => println!("Nothing saved yet."),
        OutputFormat::Text => {
            for (key, len) in &entries {
                println!("{:<16} {:>6} bytes", key.yellow(), len);
            }
        }
    }
    Ok(())
}

fn cmd_config(config: &StorefrontConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(config)?),
    }
    Ok(())
}
