use serde::Serialize;

use rr_cart::CartLedger;
use rr_prefs::SubscribeOutcome;
use rr_timer::{TaskId, TimerSnapshot};
use rr_types::{CartItem, Product, SortMode, Theme};

/// A request to the storefront, from the shopper or from the brew timer.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    AddToCart { id: String, name: String, price: f64 },
    IncrementItem { id: String },
    DecrementItem { id: String },
    ClearCart,
    Search { query: String },
    Sort { mode: SortMode },
    SelectRoast { level: String },
    StartBrew,
    ResetBrew,
    BrewTick(TaskId),
    ToggleTheme,
    SetTheme(Theme),
    Subscribe { email: String },
}

/// Fieldless identifier of an [`Action`], the dispatch table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    AddToCart,
    IncrementItem,
    DecrementItem,
    ClearCart,
    Search,
    Sort,
    SelectRoast,
    StartBrew,
    ResetBrew,
    BrewTick,
    ToggleTheme,
    SetTheme,
    Subscribe,
}

impl ActionKind {
    pub const ALL: [ActionKind; 13] = [
        ActionKind::AddToCart,
        ActionKind::IncrementItem,
        ActionKind::DecrementItem,
        ActionKind::ClearCart,
        ActionKind::Search,
        ActionKind::Sort,
        ActionKind::SelectRoast,
        ActionKind::StartBrew,
        ActionKind::ResetBrew,
        ActionKind::BrewTick,
        ActionKind::ToggleTheme,
        ActionKind::SetTheme,
        ActionKind::Subscribe,
    ];
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::AddToCart { .. } => ActionKind::AddToCart,
            Self::IncrementItem { .. } => ActionKind::IncrementItem,
            Self::DecrementItem { .. } => ActionKind::DecrementItem,
            Self::ClearCart => ActionKind::ClearCart,
            Self::Search { .. } => ActionKind::Search,
            Self::Sort { .. } => ActionKind::Sort,
            Self::SelectRoast { .. } => ActionKind::SelectRoast,
            Self::StartBrew => ActionKind::StartBrew,
            Self::ResetBrew => ActionKind::ResetBrew,
            Self::BrewTick(_) => ActionKind::BrewTick,
            Self::ToggleTheme => ActionKind::ToggleTheme,
            Self::SetTheme(_) => ActionKind::SetTheme,
            Self::Subscribe { .. } => ActionKind::Subscribe,
        }
    }

    /// Add-to-cart for a catalog product.
    pub fn add_product(product: &Product) -> Self {
        Self::AddToCart {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.amount(),
        }
    }
}

/// Cart projection handed to the view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub subtotal: f64,
    pub count: u64,
}

impl CartView {
    pub fn of(ledger: &CartLedger) -> Self {
        Self {
            items: ledger.items().cloned().collect(),
            subtotal: ledger.subtotal(),
            count: ledger.count(),
        }
    }

    /// Subtotal as shown in the cart panel.
    pub fn subtotal_display(&self) -> String {
        rr_cart::format_money(self.subtotal)
    }
}

/// What changed as a result of an action.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    Cart(CartView),
    Catalog(Vec<Product>),
    Timer(TimerSnapshot),
    /// The brew countdown reached zero. Sent once per run.
    BrewComplete(TimerSnapshot),
    Theme(Theme),
    Subscribed(SubscribeOutcome),
    /// Persistence fell back to memory-only mode; sent once.
    StorageDegraded,
    /// The action was refused; the message is meant for the shopper.
    Rejected(String),
    Unchanged,
}
