use std::collections::HashMap;

use tracing::{debug, warn};

use rr_timer::{StartOutcome, TickScheduler, TimerEvent};
use rr_types::Price;

use crate::action::{Action, ActionKind, CartView, Update};
use crate::storefront::Storefront;

/// Handler for one [`ActionKind`].
pub type Handler<S> = fn(&mut Storefront<S>, Action) -> Update;

/// Action kind to handler, resolved once when the storefront is built.
pub struct DispatchTable<S: TickScheduler> {
    handlers: HashMap<ActionKind, Handler<S>>,
}

impl<S: TickScheduler> DispatchTable<S> {
    /// The standard table covering every [`ActionKind`].
    pub fn standard() -> Self {
        let mut handlers: HashMap<ActionKind, Handler<S>> = HashMap::new();
        handlers.insert(ActionKind::AddToCart, add_to_cart::<S>);
        handlers.insert(ActionKind::IncrementItem, increment_item::<S>);
        handlers.insert(ActionKind::DecrementItem, decrement_item::<S>);
        handlers.insert(ActionKind::ClearCart, clear_cart::<S>);
        handlers.insert(ActionKind::Search, search::<S>);
        handlers.insert(ActionKind::Sort, sort::<S>);
        handlers.insert(ActionKind::SelectRoast, select_roast::<S>);
        handlers.insert(ActionKind::StartBrew, start_brew::<S>);
        handlers.insert(ActionKind::ResetBrew, reset_brew::<S>);
        handlers.insert(ActionKind::BrewTick, brew_tick::<S>);
        handlers.insert(ActionKind::ToggleTheme, toggle_theme::<S>);
        handlers.insert(ActionKind::SetTheme, set_theme::<S>);
        handlers.insert(ActionKind::Subscribe, subscribe::<S>);
        Self { handlers }
    }

    pub fn get(&self, kind: ActionKind) -> Option<Handler<S>> {
        self.handlers.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S: TickScheduler> std::fmt::Debug for DispatchTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn mismatched(kind: ActionKind) -> Update {
    warn!(?kind, "handler received an action of another kind");
    Update::Unchanged
}

fn add_to_cart<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::AddToCart { id, name, price } = action else {
        return mismatched(kind);
    };
    match Price::new(price) {
        Ok(price) => Update::Cart(CartView::of(sf.cart_mut().add(&id, &name, price))),
        Err(e) => {
            debug!(id = %id, error = %e, "add to cart rejected");
            Update::Rejected(e.to_string())
        }
    }
}

fn increment_item<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::IncrementItem { id } = action else {
        return mismatched(kind);
    };
    Update::Cart(CartView::of(sf.cart_mut().increment(&id)))
}

fn decrement_item<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::DecrementItem { id } = action else {
        return mismatched(kind);
    };
    Update::Cart(CartView::of(sf.cart_mut().decrement(&id)))
}

fn clear_cart<S: TickScheduler>(sf: &mut Storefront<S>, _action: Action) -> Update {
    Update::Cart(CartView::of(sf.cart_mut().clear()))
}

fn search<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::Search { query } = action else {
        return mismatched(kind);
    };
    sf.filter_mut().query = query;
    Update::Catalog(sf.visible_products())
}

fn sort<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::Sort { mode } = action else {
        return mismatched(kind);
    };
    sf.filter_mut().sort = mode;
    Update::Catalog(sf.visible_products())
}

fn select_roast<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::SelectRoast { level } = action else {
        return mismatched(kind);
    };
    match sf.timer_mut().configure_named(&level) {
        Ok(()) => Update::Timer(sf.timer().snapshot()),
        Err(e) => {
            warn!(error = %e, "roast selection ignored");
            Update::Unchanged
        }
    }
}

fn start_brew<S: TickScheduler>(sf: &mut Storefront<S>, _action: Action) -> Update {
    match sf.timer_mut().start() {
        StartOutcome::Started(_) => Update::Timer(sf.timer().snapshot()),
        StartOutcome::AlreadyRunning | StartOutcome::AlreadyComplete => Update::Unchanged,
    }
}

fn reset_brew<S: TickScheduler>(sf: &mut Storefront<S>, _action: Action) -> Update {
    sf.timer_mut().reset();
    Update::Timer(sf.timer().snapshot())
}

fn brew_tick<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::BrewTick(task) = action else {
        return mismatched(kind);
    };
    match sf.timer_mut().tick(task) {
        None => Update::Unchanged,
        Some(TimerEvent::Ticked { .. }) => Update::Timer(sf.timer().snapshot()),
        Some(TimerEvent::Completed) => Update::BrewComplete(sf.timer().snapshot()),
    }
}

fn toggle_theme<S: TickScheduler>(sf: &mut Storefront<S>, _action: Action) -> Update {
    Update::Theme(sf.theme_preference().toggle())
}

fn set_theme<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::SetTheme(theme) = action else {
        return mismatched(kind);
    };
    Update::Theme(sf.theme_preference().set(theme))
}

fn subscribe<S: TickScheduler>(sf: &mut Storefront<S>, action: Action) -> Update {
    let kind = action.kind();
    let Action::Subscribe { email } = action else {
        return mismatched(kind);
    };
    match sf.subscribers().subscribe(&email) {
        Ok(outcome) => Update::Subscribed(outcome),
        Err(e) => Update::Rejected(e.to_string()),
    }
}
