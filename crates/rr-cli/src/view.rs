use std::io::Write;
use std::ops::ControlFlow;

use colored::Colorize;
use serde_json::json;

use rr_app::{CartView, Product, TimerSnapshot, Update, View};
use rr_prefs::SubscribeOutcome;

use crate::cli::OutputFormat;

/// Renders updates to stdout. Warnings go to stderr.
pub struct TerminalView {
    format: OutputFormat,
    /// A `\r` progress line is open and needs a newline before other output.
    progress_open: bool,
}

impl TerminalView {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            progress_open: false,
        }
    }

    fn close_progress(&mut self) {
        if self.progress_open {
            println!();
            self.progress_open = false;
        }
    }

    fn cart(&self, cart: &CartView) {
        if self.format == OutputFormat::Json {
            println!("{}", json!({ "cart": cart }));
            return;
        }
        if cart.items.is_empty() {
            println!("Your cart is empty.");
            return;
        }
        for item in &cart.items {
            println!(
                "  {:>3} x {:<24} {:>9}  {}",
                item.qty,
                item.name,
                rr_types::product::format_money(item.line_total()),
                item.id.dimmed()
            );
        }
        println!(
            "  {} {} item(s), subtotal {}",
            "Σ".bold(),
            cart.count,
            cart.subtotal_display().green().bold()
        );
    }

    fn catalog(&self, products: &[Product]) {
        if self.format == OutputFormat::Json {
            println!("{}", json!({ "products": products }));
            return;
        }
        if products.is_empty() {
            println!("No products match.");
            return;
        }
        for p in products {
            println!(
                "{:<12} {:<24} {:>8}  {}",
                p.id.yellow(),
                p.name.bold(),
                p.price.to_string(),
                p.description.dimmed()
            );
        }
    }

    fn timer(&mut self, snap: &TimerSnapshot) {
        if self.format == OutputFormat::Json {
            println!("{}", json!({ "timer": snap }));
            return;
        }
        let filled = usize::from(snap.progress_percent()) / 5;
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled));
        let state = if snap.running { "brewing".cyan() } else { "ready".normal() };
        print!(
            "\r{} roast  {}  [{}] {:>3}%  {}",
            snap.level,
            snap.display().bold(),
            bar,
            snap.progress_percent(),
            state
        );
        let _ = std::io::stdout().flush();
        self.progress_open = true;
    }
}

impl View for TerminalView {
    fn render(&mut self, update: &Update) -> ControlFlow<()> {
        match update {
            Update::Timer(snap) => {
                self.timer(snap);
                return ControlFlow::Continue(());
            }
            Update::Unchanged => return ControlFlow::Continue(()),
            _ => self.close_progress(),
        }

        match update {
            Update::Cart(cart) => self.cart(cart),
            Update::Catalog(products) => self.catalog(products),
            Update::BrewComplete(snap) => {
                if self.format == OutputFormat::Json {
                    println!("{}", json!({ "complete": snap }));
                } else {
                    println!("{} {} brew complete. Enjoy!", "✓".green().bold(), snap.level);
                }
                return ControlFlow::Break(());
            }
            Update::Theme(theme) => match self.format {
                OutputFormat::Json => println!("{}", json!({ "theme": theme })),
                OutputFormat::Text => println!("Theme: {}", theme.as_str().bold()),
            },
            Update::Subscribed(outcome) => {
                let (email, fresh) = match outcome {
                    SubscribeOutcome::Subscribed(email) => (email, true),
                    SubscribeOutcome::AlreadySubscribed(email) => (email, false),
                };
                match self.format {
                    OutputFormat::Json => {
                        println!("{}", json!({ "email": email, "new": fresh }))
                    }
                    OutputFormat::Text if fresh => {
                        println!("{} Subscribed {}", "✓".green().bold(), email.bold())
                    }
                    OutputFormat::Text => println!("{} is already subscribed", email.bold()),
                }
            }
            Update::StorageDegraded => eprintln!(
                "{} storage unavailable; changes will not be saved",
                "warning:".yellow().bold()
            ),
            Update::Rejected(reason) => eprintln!("{} {}", "error:".red().bold(), reason),
            Update::Timer(_) | Update::Unchanged => {}
        }
        ControlFlow::Continue(())
    }
}
