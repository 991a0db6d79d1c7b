//! Kitchen production: one hour of work against the order queue.
//!
//! Strictly FIFO by queue position -- never by profitability or deadline
//! proximity. The hour first expires stale orders (expiry runs even when
//! capacity is zero), then prepares units one at a time up to the
//! effective capacity, staying on the head order until it completes or
//! runs out of ingredients.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use griddle_ledger::Ledger;
use griddle_menu::MenuCatalog;
use griddle_stock::StockStore;
use griddle_types::{Order, OrderId};

use crate::reputation::Reputation;

/// Reputation gained when an order completes.
const COMPLETION_REPUTATION: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Reputation lost when an order expires.
const EXPIRY_REPUTATION: Decimal = Decimal::from_parts(5, 0, 0, true, 0);

/// Borrowed state the kitchen works against for one hour.
pub(crate) struct KitchenShift<'a> {
    /// The order queue, FIFO.
    pub queue: &'a mut Vec<Order>,
    /// The menu.
    pub menu: &'a MenuCatalog,
    /// The ingredient store.
    pub stock: &'a mut StockStore,
    /// The ledger sales settle through.
    pub ledger: &'a mut Ledger,
    /// Reputation, adjusted on completion and expiry.
    pub reputation: &'a mut Reputation,
    /// Units the kitchen can produce this hour.
    pub capacity: u32,
    /// The hour being processed.
    pub current_hour: u32,
    /// Hours an order may wait before expiring.
    pub order_timeout: u32,
}

/// What one kitchen hour accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct KitchenSummary {
    /// Units prepared across all orders.
    pub units_prepared: u32,
    /// Orders fully completed and removed.
    pub completed: Vec<OrderId>,
    /// Orders expired and removed (reputation penalty applied).
    pub expired: Vec<OrderId>,
    /// Orders skipped this hour, with the reason.
    pub skipped: Vec<(OrderId, String)>,
}

/// Effective capacity: the upgrade-derived base scaled by the active
/// event multiplier, floored to a whole unit count.
///
/// Capacity is always computed from its inputs at the point of use --
/// nothing stores a capacity that an event once scaled.
pub(crate) fn effective_capacity(base: u32, multiplier: Decimal) -> u32 {
    Decimal::from(base)
        .saturating_mul(multiplier)
        .floor()
        .to_u32()
        .unwrap_or(0)
}

/// Run one hour of kitchen work.
pub(crate) fn run_shift(shift: &mut KitchenShift<'_>) -> KitchenSummary {
    let mut summary = KitchenSummary::default();

    expire_stale_orders(shift, &mut summary);

    if shift.capacity == 0 {
        debug!("kitchen idle this hour (capacity 0)");
        return summary;
    }

    let mut index = 0;
    while summary.units_prepared < shift.capacity && index < shift.queue.len() {
        let Some(order) = shift.queue.get(index).cloned() else {
            break;
        };

        let Some(recipe) = shift.menu.recipe(&order.recipe_id) else {
            warn!(order = %order.id, recipe = order.recipe_id, "dropping order for unknown recipe");
            shift.queue.remove(index);
            summary
                .skipped
                .push((order.id, format!("unknown recipe {}", order.recipe_id)));
            continue;
        };

        // One unit at a time: availability, settlement, consumption.
        if let Err(shortfall) = shift.stock.check_availability(&recipe.ingredients) {
            debug!(order = %order.id, %shortfall, "order waits on ingredients");
            summary.skipped.push((order.id, shortfall.to_string()));
            index = index.saturating_add(1);
            continue;
        }

        if let Err(declined) = shift
            .ledger
            .settle_sale(recipe.price, recipe.cost, &recipe.name)
        {
            warn!(order = %order.id, %declined, "sale declined");
            summary.skipped.push((order.id, declined.to_string()));
            index = index.saturating_add(1);
            continue;
        }

        if let Err(err) = shift.stock.consume(&recipe.ingredients) {
            // Unreachable after the availability check; the stores are
            // locked for the whole shift.
            error!(order = %order.id, %err, "consumption failed after availability check");
            index = index.saturating_add(1);
            continue;
        }

        summary.units_prepared = summary.units_prepared.saturating_add(1);

        if let Some(entry) = shift.queue.get_mut(index) {
            entry.remaining = entry.remaining.saturating_sub(1);
            if entry.remaining == 0 {
                shift.queue.remove(index);
                shift.reputation.adjust(COMPLETION_REPUTATION);
                shift.ledger.record_completed_order();
                summary.completed.push(order.id);
                // Do not advance: the next order slid into this slot.
            }
            // An incomplete order keeps the kitchen's attention until it
            // finishes or the capacity for the hour is spent.
        }
    }

    summary
}

/// Remove every order that has waited past the timeout, charging the
/// reputation penalty per expiry.
fn expire_stale_orders(shift: &mut KitchenShift<'_>, summary: &mut KitchenSummary) {
    let timeout = shift.order_timeout;
    let hour = shift.current_hour;

    let mut kept = Vec::with_capacity(shift.queue.len());
    for order in shift.queue.drain(..) {
        if order.hours_waited(hour) > timeout {
            warn!(order = %order.id, waited = order.hours_waited(hour), "order expired");
            shift.reputation.adjust(EXPIRY_REPUTATION);
            summary.expired.push(order.id);
        } else {
            kept.push(order);
        }
    }
    *shift.queue = kept;
}
