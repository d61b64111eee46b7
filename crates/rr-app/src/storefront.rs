use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use rr_cart::Cart;
use rr_catalog::FilterState;
use rr_prefs::{Subscribers, ThemePreference};
use rr_store::{KvStore, StoreMode};
use rr_timer::{BrewTimer, IntervalScheduler, TickScheduler, TimerSnapshot};
use rr_types::{Product, Theme};

use crate::action::{Action, CartView, Update};
use crate::config::StorefrontConfig;
use crate::dispatch::DispatchTable;

/// Storefront driven by tokio interval ticks posted to an action channel.
pub type LiveStorefront = Storefront<IntervalScheduler<Action>>;

/// The storefront engine: one instance per page/session.
///
/// Owns every piece of engine state. Components that persist share the
/// single [`KvStore`] handle passed in at construction.
pub struct Storefront<S: TickScheduler> {
    store: Arc<KvStore>,
    cart: Cart,
    catalog: Vec<Product>,
    filter: FilterState,
    timer: BrewTimer<S>,
    theme: ThemePreference,
    subscribers: Subscribers,
    handlers: DispatchTable<S>,
    storage_degraded_reported: bool,
}

impl<S: TickScheduler> Storefront<S> {
    /// Build a storefront over `store` and `catalog`.
    ///
    /// The cart is loaded from the store and the timer starts configured for
    /// `config.default_roast`, so the brew display shows a full duration.
    pub fn new(
        config: &StorefrontConfig,
        store: Arc<KvStore>,
        catalog: Vec<Product>,
        scheduler: S,
    ) -> Self {
        let cart = Cart::load(Arc::clone(&store));
        let mut timer =
            BrewTimer::with_period(scheduler, config.default_roast, config.tick_period());
        timer.configure(config.default_roast);

        info!(
            backend = store.backend_name(),
            products = catalog.len(),
            cart_lines = cart.ledger().len(),
            roast = %config.default_roast,
            "storefront ready"
        );

        Self {
            theme: ThemePreference::new(Arc::clone(&store)),
            subscribers: Subscribers::new(Arc::clone(&store)),
            store,
            cart,
            catalog,
            filter: FilterState::new("", config.default_sort),
            timer,
            handlers: DispatchTable::standard(),
            storage_degraded_reported: false,
        }
    }

    /// Default config, in-memory store, demo catalog.
    pub fn in_memory(scheduler: S) -> Self {
        Self::new(
            &StorefrontConfig::default(),
            Arc::new(KvStore::in_memory()),
            rr_catalog::demo_catalog(),
            scheduler,
        )
    }

    /// Route `action` through the dispatch table.
    pub fn dispatch(&mut self, action: Action) -> Update {
        let kind = action.kind();
        let Some(handler) = self.handlers.get(kind) else {
            debug!(?kind, "no handler registered");
            return Update::Unchanged;
        };
        handler(self, action)
    }

    /// Returns `true` exactly once, the first time it is called after the
    /// store fell back to memory-only mode.
    pub fn poll_storage_degraded(&mut self) -> bool {
        if self.storage_degraded_reported || !self.store.is_memory_only() {
            return false;
        }
        self.storage_degraded_reported = true;
        true
    }

    pub fn store_mode(&self) -> StoreMode {
        self.store.mode()
    }

    pub fn store(&self) -> &Arc<KvStore> {
        &self.store
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn cart_view(&self) -> CartView {
        CartView::of(self.cart.ledger())
    }

    /// The full, unfiltered catalog.
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Look up a catalog product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        rr_catalog::find(&self.catalog, id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    /// Catalog after the current search and sort.
    pub fn visible_products(&self) -> Vec<Product> {
        self.filter.apply(&self.catalog)
    }

    pub fn timer(&self) -> &BrewTimer<S> {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut BrewTimer<S> {
        &mut self.timer
    }

    pub fn timer_snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    pub fn theme_preference(&self) -> &ThemePreference {
        &self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }
}

impl LiveStorefront {
    /// Build a storefront whose timer ticks arrive on a fresh action channel.
    ///
    /// Returns the storefront, a sender for shopper actions, and the receiver
    /// to hand to [`crate::run`]. Must be called within a tokio runtime
    /// before the first `StartBrew`.
    pub fn with_channel(
        config: &StorefrontConfig,
        store: Arc<KvStore>,
        catalog: Vec<Product>,
    ) -> (
        Self,
        mpsc::UnboundedSender<Action>,
        mpsc::UnboundedReceiver<Action>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = IntervalScheduler::new(tx.clone(), Action::BrewTick);
        (Self::new(config, store, catalog, scheduler), tx, rx)
    }
}

impl<S: TickScheduler> std::fmt::Debug for Storefront<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("store", &self.store)
            .field("cart_lines", &self.cart.ledger().len())
            .field("products", &self.catalog.len())
            .field("filter", &self.filter)
            .field("timer", &self.timer.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rr_prefs::SubscribeOutcome;
    use rr_store::UnavailableKvBackend;
    use rr_timer::{ManualScheduler, TimerPhase};
    use rr_types::{keys, SortMode};

    use super::*;

    fn storefront() -> Storefront<ManualScheduler> {
        Storefront::in_memory(ManualScheduler::new())
    }

    fn add(id: &str, name: &str, price: f64) -> Action {
        Action::AddToCart {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    fn cart_of(update: Update) -> CartView {
        match update {
            Update::Cart(view) => view,
            other => panic!("expected cart update, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Cart
    // -----------------------------------------------------------------------

    #[test]
    fn add_twice_then_totals() {
        let mut sf = storefront();
        sf.dispatch(add("espresso", "Espresso Kiss", 16.0));
        let view = cart_of(sf.dispatch(add("espresso", "Espresso Kiss", 16.0)));
        assert_eq!(view.count, 2);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].qty, 2);
        assert_eq!(view.subtotal_display(), "$32.00");
    }

    #[test]
    fn decrement_last_unit_empties_cart() {
        let mut sf = storefront();
        sf.dispatch(add("espresso", "Espresso Kiss", 16.0));
        let view = cart_of(sf.dispatch(Action::DecrementItem { id: "espresso".into() }));
        assert_eq!(view.count, 0);
        assert!(view.items.is_empty());
    }

    #[test]
    fn negative_price_is_rejected_without_mutation() {
        let mut sf = storefront();
        let update = sf.dispatch(add("espresso", "Espresso Kiss", -1.0));
        assert!(matches!(update, Update::Rejected(_)));
        assert!(sf.cart().ledger().is_empty());
        assert_eq!(sf.store().get(keys::CART), None);
    }

    #[test]
    fn cart_survives_a_new_storefront_on_the_same_store() {
        let store = Arc::new(KvStore::in_memory());
        let config = StorefrontConfig::default();
        {
            let mut sf = Storefront::new(
                &config,
                Arc::clone(&store),
                rr_catalog::demo_catalog(),
                ManualScheduler::new(),
            );
            let product = sf.product("sunshine").cloned().unwrap();
            sf.dispatch(Action::add_product(&product));
            sf.dispatch(Action::IncrementItem { id: "sunshine".into() });
        }
        let sf = Storefront::new(
            &config,
            store,
            rr_catalog::demo_catalog(),
            ManualScheduler::new(),
        );
        assert_eq!(sf.cart_view().count, 2);
        assert_eq!(sf.cart_view().subtotal, 36.0);
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    #[test]
    fn search_and_sort_update_catalog() {
        let mut sf = storefront();
        let search = Action::Search {
            query: "sunshine".into(),
        };
        let Update::Catalog(products) = sf.dispatch(search) else {
            panic!("expected catalog");
        };
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "sunshine");

        sf.dispatch(Action::Search { query: String::new() });
        let sort = Action::Sort {
            mode: SortMode::PriceAsc,
        };
        let Update::Catalog(products) = sf.dispatch(sort) else {
            panic!("expected catalog");
        };
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["decaf", "espresso", "sunshine"]);
        assert_eq!(sf.catalog().len(), 3);
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    #[test]
    fn timer_starts_configured_for_default_roast() {
        let sf = storefront();
        let snap = sf.timer_snapshot();
        assert_eq!(snap.phase, TimerPhase::Configured);
        assert_eq!((snap.total, snap.remaining), (210, 210));
    }

    #[test]
    fn light_brew_completes_once() {
        let mut sf = storefront();
        sf.dispatch(Action::SelectRoast { level: "light".into() });
        sf.dispatch(Action::StartBrew);
        assert_eq!(sf.dispatch(Action::StartBrew), Update::Unchanged);
        assert_eq!(sf.timer().scheduler().scheduled(), 1);

        let task = sf.timer().task_id().unwrap();
        let mut completions = 0;
        for _ in 0..150 {
            if let Update::BrewComplete(snap) = sf.dispatch(Action::BrewTick(task)) {
                completions += 1;
                assert_eq!(snap.remaining, 0);
                assert_eq!(snap.phase, TimerPhase::Complete);
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(sf.dispatch(Action::BrewTick(task)), Update::Unchanged);
        assert_eq!(sf.dispatch(Action::StartBrew), Update::Unchanged);
    }

    #[test]
    fn unknown_roast_is_ignored() {
        let mut sf = storefront();
        assert_eq!(
            sf.dispatch(Action::SelectRoast { level: "burnt".into() }),
            Update::Unchanged
        );
        assert_eq!(sf.timer_snapshot().total, 210);
    }

    #[test]
    fn reset_cancels_countdown() {
        let mut sf = storefront();
        sf.dispatch(Action::StartBrew);
        let task = sf.timer().task_id().unwrap();
        sf.dispatch(Action::BrewTick(task));
        let Update::Timer(snap) = sf.dispatch(Action::ResetBrew) else {
            panic!("expected timer update");
        };
        assert_eq!(snap.remaining, 210);
        assert!(!snap.running);
        assert_eq!(sf.dispatch(Action::BrewTick(task)), Update::Unchanged);
    }

    // -----------------------------------------------------------------------
    // Preferences
    // -----------------------------------------------------------------------

    #[test]
    fn theme_toggle_and_set() {
        let mut sf = storefront();
        assert_eq!(sf.dispatch(Action::ToggleTheme), Update::Theme(Theme::Dark));
        assert_eq!(sf.theme(), Theme::Dark);
        assert_eq!(sf.dispatch(Action::SetTheme(Theme::Light)), Update::Theme(Theme::Light));
    }

    #[test]
    fn subscribe_validates() {
        let mut sf = storefront();
        assert!(matches!(
            sf.dispatch(Action::Subscribe { email: "nope".into() }),
            Update::Rejected(_)
        ));
        assert_eq!(
            sf.dispatch(Action::Subscribe { email: "ada@example.com".into() }),
            Update::Subscribed(SubscribeOutcome::Subscribed("ada@example.com".into()))
        );
    }

    // -----------------------------------------------------------------------
    // Storage fallback
    // -----------------------------------------------------------------------

    #[test]
    fn unavailable_storage_is_reported_once() {
        let mut sf = Storefront::new(
            &StorefrontConfig::default(),
            Arc::new(KvStore::new(UnavailableKvBackend)),
            rr_catalog::demo_catalog(),
            ManualScheduler::new(),
        );
        assert!(!sf.poll_storage_degraded());

        sf.dispatch(add("espresso", "Espresso Kiss", 16.0));
        assert_eq!(sf.store_mode(), StoreMode::MemoryOnly);
        assert!(sf.poll_storage_degraded());
        assert!(!sf.poll_storage_degraded());

        // The session cart keeps working.
        let view = cart_of(sf.dispatch(add("espresso", "Espresso Kiss", 16.0)));
        assert_eq!(view.count, 2);
    }
}
