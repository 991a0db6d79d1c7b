//! Core entity structs: orders, transactions, reports, and the snapshot
//! shape shared between the engine and the persistence layer.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{
    Achievement, DailyCostKind, Difficulty, GameOutcome, SpecialEvent, TransactionKind,
    UpgradeKind,
};
use crate::ids::{GameId, OrderId};

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// A customer order sitting in the kitchen queue.
///
/// `remaining` only ever decreases; the order is removed from the queue
/// exactly when it reaches 0, or when the order has waited past the
/// configured timeout (expiry, with a reputation penalty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique, strictly increasing order id.
    pub id: OrderId,
    /// The recipe the customer asked for.
    pub recipe_id: String,
    /// Display name of the recipe, captured at order time.
    pub recipe_name: String,
    /// Units ordered.
    pub quantity: u32,
    /// Units still to prepare.
    pub remaining: u32,
    /// Hour of day the order arrived.
    pub arrival_hour: u32,
}

impl Order {
    /// Hours this order has been waiting, given the current hour.
    pub const fn hours_waited(&self, current_hour: u32) -> u32 {
        current_hour.saturating_sub(self.arrival_hour)
    }
}

// ---------------------------------------------------------------------------
// Ledger records
// ---------------------------------------------------------------------------

/// A single recorded money movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Wall-clock time the transaction was recorded.
    pub timestamp: DateTime<Utc>,
    /// Revenue or expense.
    pub kind: TransactionKind,
    /// Amount moved. Always strictly positive.
    pub amount: Decimal,
    /// Human-readable memo, e.g. `"Sale: Classic Burger"`.
    pub memo: String,
    /// Balance after the transaction was applied.
    pub balance_after: Decimal,
}

/// Per-day running totals, reset at day-end settlement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyStats {
    /// Money taken in today.
    pub revenue: Decimal,
    /// Money paid out today.
    pub expenses: Decimal,
    /// Net of the two.
    pub profit: Decimal,
    /// Orders fully completed today.
    pub orders_completed: u32,
}

/// Lifetime totals across the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    /// All revenue ever recorded.
    pub total_revenue: Decimal,
    /// All expenses ever recorded.
    pub total_expenses: Decimal,
    /// Net profit over the session.
    pub total_profit: Decimal,
    /// Best single-day profit seen at settlement.
    pub best_day_profit: Decimal,
    /// Worst single-day loss seen at settlement.
    pub worst_day_loss: Decimal,
}

/// Outcome of settling one sale through the ledger.
///
/// The difficulty's profit multiplier scales revenue before the net is
/// computed, so a sale can settle at a loss on the harder difficulties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBreakdown {
    /// `price - ingredient_cost`, before the multiplier.
    pub gross_profit: Decimal,
    /// `price * multiplier - ingredient_cost`; may be negative.
    pub net_profit: Decimal,
    /// The difficulty-derived profit multiplier that was applied.
    pub profit_multiplier: Decimal,
    /// `price * multiplier`.
    pub adjusted_revenue: Decimal,
    /// Ingredient cost charged against the sale.
    pub ingredient_cost: Decimal,
    /// Whether the net was non-negative.
    pub profitable: bool,
}

/// Result of applying daily fixed costs at day-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySettlement {
    /// Total debited across all applied costs.
    pub total_cost: Decimal,
    /// In-game days covered by this settlement.
    pub days_passed: u32,
    /// Amount applied per cost kind.
    pub breakdown: BTreeMap<DailyCostKind, Decimal>,
    /// Non-critical costs that were skipped for lack of funds.
    pub skipped: Vec<DailyCostKind>,
    /// Balance after settlement.
    pub new_balance: Decimal,
    /// Days in operation after this settlement.
    pub day_number: u32,
}

// ---------------------------------------------------------------------------
// Stock reports
// ---------------------------------------------------------------------------

/// One ingredient that a recipe needs more of than the store holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortfallItem {
    /// Display name of the ingredient.
    pub name: String,
    /// Units the recipe requires.
    pub needed: u32,
    /// Units currently in stock.
    pub available: u32,
}

/// Full availability report: every missing and insufficient ingredient,
/// never just the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockShortfall {
    /// Ingredient paths that do not exist in the store at all.
    pub missing: Vec<String>,
    /// Ingredients present but below the required quantity.
    pub insufficient: Vec<ShortfallItem>,
}

impl StockShortfall {
    /// Whether the report is empty, i.e. everything was available.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.insufficient.is_empty()
    }
}

impl core::fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for path in &self.missing {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "not found: {path}")?;
            first = false;
        }
        for item in &self.insufficient {
            if !first {
                write!(f, "; ")?;
            }
            write!(
                f,
                "{}: need {}, have {}",
                item.name, item.needed, item.available
            )?;
            first = false;
        }
        Ok(())
    }
}

/// What a budgeted auto-restock run actually bought.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestockReport {
    /// `(display name, units bought)` per restocked ingredient.
    pub restocked: Vec<(String, u32)>,
    /// Total spent, within the caller's budget.
    pub total_cost: Decimal,
}

// ---------------------------------------------------------------------------
// Menu reports
// ---------------------------------------------------------------------------

/// Profitability analysis of a single recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profitability {
    /// Recipe id.
    pub recipe_id: String,
    /// Recipe display name.
    pub recipe_name: String,
    /// Sum of ingredient quantity times unit cost.
    pub ingredient_cost: Decimal,
    /// Menu price.
    pub selling_price: Decimal,
    /// `price - ingredient_cost`.
    pub profit: Decimal,
    /// Profit as a percentage of price; zero when the price is zero.
    pub margin_percent: Decimal,
    /// Whether the profit is strictly positive.
    pub profitable: bool,
}

// ---------------------------------------------------------------------------
// Engine reports (observer payloads)
// ---------------------------------------------------------------------------

/// Summary of one processed working hour, pushed to the observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyReport {
    /// Current in-game day (1-based).
    pub day: u32,
    /// Hour just processed.
    pub hour: u32,
    /// Balance after the hour.
    pub balance: Decimal,
    /// Reputation after the hour.
    pub reputation: Decimal,
    /// Effective kitchen capacity used this hour.
    pub capacity: u32,
    /// Orders that arrived this hour.
    pub new_orders: u32,
    /// Units prepared this hour.
    pub units_prepared: u32,
    /// Orders fully completed this hour.
    pub orders_completed: Vec<OrderId>,
    /// Orders expired (waited past the timeout) this hour.
    pub orders_expired: Vec<OrderId>,
    /// Queue contents after the hour, in FIFO order.
    pub queue: Vec<Order>,
    /// Active events and their remaining hours.
    pub active_events: BTreeMap<SpecialEvent, u32>,
}

/// Summary of a day-end settlement, pushed to the observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    /// The day that just ended.
    pub day: u32,
    /// The daily-cost settlement that was applied.
    pub settlement: DailySettlement,
    /// Balance after settlement.
    pub balance: Decimal,
    /// Reputation at day end.
    pub reputation: Decimal,
    /// Orders completed over the day.
    pub orders_completed: u32,
}

/// Final statistics delivered with the terminal notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStats {
    /// How the session ended.
    pub outcome: GameOutcome,
    /// Day the session ended on.
    pub day: u32,
    /// Final balance.
    pub balance: Decimal,
    /// Final reputation.
    pub reputation: Decimal,
    /// Orders completed across the session.
    pub orders_completed_total: u64,
    /// Total upgrade purchases.
    pub upgrades_purchased: u32,
    /// Achievements unlocked during the session.
    pub achievements: BTreeSet<Achievement>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Ledger state as carried in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Current balance.
    pub balance: Decimal,
    /// Running per-day totals.
    pub daily_stats: DailyStats,
    /// Days of operation settled so far.
    pub days_in_operation: u32,
    /// The last in-game day daily costs were applied for.
    pub last_processed_day: u32,
    /// Lifetime totals.
    pub lifetime: LifetimeStats,
}

/// Complete game state, sufficient to resume a session at the start of
/// the next unprocessed hour.
///
/// This is the flat structure the persistence layer writes as JSON. It is
/// a best-effort snapshot: a crash between a mutation and its save loses
/// at most the unsaved actions, which is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Session identifier.
    pub game_id: GameId,
    /// Player name entered at new-game.
    pub player_name: String,
    /// Restaurant name entered at new-game.
    pub restaurant_name: String,
    /// Selected difficulty.
    pub difficulty: Difficulty,
    /// Current in-game day (1-based).
    pub day: u32,
    /// Current hour of day.
    pub hour: u32,
    /// Reputation, 0 to 100.
    pub reputation: Decimal,
    /// Purchase count per upgrade.
    pub upgrade_counts: BTreeMap<UpgradeKind, u32>,
    /// Recipe ids the player can currently sell.
    pub unlocked_recipes: BTreeSet<String>,
    /// Achievements unlocked so far.
    pub achievements: BTreeSet<Achievement>,
    /// Pending orders in FIFO order.
    pub order_queue: Vec<Order>,
    /// Next value of the order id sequence.
    pub next_order_id: u64,
    /// Active events and their remaining hours.
    pub active_events: BTreeMap<SpecialEvent, u32>,
    /// Hours elapsed since the last event fired.
    pub hours_since_last_event: u32,
    /// Hours until the next event roll.
    pub next_event_interval: u32,
    /// Orders completed today.
    pub orders_completed_today: u32,
    /// Orders completed across the session.
    pub orders_completed_total: u64,
    /// Ledger state.
    pub ledger: LedgerSnapshot,
    /// Ingredient quantities by path (`"category.name"`).
    pub stock_quantities: BTreeMap<String, u32>,
    /// Wall-clock time the snapshot was taken.
    pub saved_at: DateTime<Utc>,
}
