use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rr_timer::TickScheduler;

use crate::action::{Action, Update};
use crate::storefront::Storefront;

/// Presentation side of the event loop.
pub trait View {
    /// Show `update`. Return `Break` to stop the loop.
    fn render(&mut self, update: &Update) -> ControlFlow<()>;
}

impl<F> View for F
where
    F: FnMut(&Update) -> ControlFlow<()>,
{
    fn render(&mut self, update: &Update) -> ControlFlow<()> {
        self(update)
    }
}

/// Counters from one [`run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Actions taken off the channel.
    pub processed: u64,
    /// Of those, how many changed nothing.
    pub unchanged: u64,
}

/// Drive `storefront` from `actions` until the view breaks or every sender
/// is gone.
///
/// Actions are handled one at a time, in arrival order, on the calling task.
/// Timer ticks arrive on the same channel as shopper actions, so no two
/// mutations ever interleave.
pub async fn run<S, V>(
    storefront: &mut Storefront<S>,
    actions: &mut mpsc::UnboundedReceiver<Action>,
    view: &mut V,
) -> RunSummary
where
    S: TickScheduler,
    V: View + ?Sized,
{
    let mut summary = RunSummary::default();

    while let Some(action) = actions.recv().await {
        summary.processed += 1;
        let kind = action.kind();
        let update = storefront.dispatch(action);
        if update == Update::Unchanged {
            summary.unchanged += 1;
        }
        debug!(?kind, "action handled");

        let mut flow = view.render(&update);
        if storefront.poll_storage_degraded() {
            warn!("storage unavailable; changes will not outlive this session");
            if view.render(&Update::StorageDegraded).is_break() {
                flow = ControlFlow::Break(());
            }
        }
        if flow.is_break() {
            break;
        }
    }

    info!(
        processed = summary.processed,
        unchanged = summary.unchanged,
        "event loop stopped"
    );
    summary
}
