//! The ledger: balance, transaction history, sale settlement, daily costs.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use griddle_types::{
    DailyCostKind, DailySettlement, DailyStats, LedgerSnapshot, LifetimeStats, SaleBreakdown,
    Transaction, TransactionKind,
};

use crate::costs::DailyCosts;
use crate::LedgerError;

/// Outcome of closing out the elapsed in-game days.
///
/// Bankruptcy is an expected terminal outcome of the simulation, not an
/// error; callers inspect the variant and halt further hour-advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCloseOutcome {
    /// No days have elapsed since the last settlement; nothing was charged.
    UpToDate,
    /// Costs were applied. Non-critical costs may have been skipped.
    Settled(DailySettlement),
    /// The balance could not cover the critical costs for the period.
    /// Nothing was charged; the restaurant is bankrupt.
    Bankrupt {
        /// Critical cost total that was due.
        critical_due: Decimal,
        /// Balance at the time of settlement.
        available: Decimal,
        /// Days the settlement would have covered.
        days_passed: u32,
    },
}

/// The restaurant's ledger.
///
/// Owns the balance, the append-only transaction log, per-day and
/// lifetime statistics, the fixed daily cost table, and the
/// difficulty-derived profit multiplier applied to sale revenue.
#[derive(Debug, Clone)]
pub struct Ledger {
    balance: Decimal,
    daily_stats: DailyStats,
    lifetime: LifetimeStats,
    days_in_operation: u32,
    last_processed_day: u32,
    transactions: Vec<Transaction>,
    daily_costs: DailyCosts,
    profit_multiplier: Decimal,
}

impl Ledger {
    /// Create a ledger for a fresh game.
    pub const fn new(
        initial_balance: Decimal,
        daily_costs: DailyCosts,
        profit_multiplier: Decimal,
    ) -> Self {
        Self {
            balance: initial_balance,
            daily_stats: DailyStats {
                revenue: Decimal::ZERO,
                expenses: Decimal::ZERO,
                profit: Decimal::ZERO,
                orders_completed: 0,
            },
            lifetime: LifetimeStats {
                total_revenue: Decimal::ZERO,
                total_expenses: Decimal::ZERO,
                total_profit: Decimal::ZERO,
                best_day_profit: Decimal::ZERO,
                worst_day_loss: Decimal::ZERO,
            },
            days_in_operation: 0,
            last_processed_day: 0,
            transactions: Vec::new(),
            daily_costs,
            profit_multiplier,
        }
    }

    /// Restore a ledger from snapshot state.
    ///
    /// The transaction log is not part of the snapshot; a restored ledger
    /// starts with an empty log and the snapshot's balances.
    pub const fn from_snapshot(
        snapshot: LedgerSnapshot,
        daily_costs: DailyCosts,
        profit_multiplier: Decimal,
    ) -> Self {
        Self {
            balance: snapshot.balance,
            daily_stats: snapshot.daily_stats,
            lifetime: snapshot.lifetime,
            days_in_operation: snapshot.days_in_operation,
            last_processed_day: snapshot.last_processed_day,
            transactions: Vec::new(),
            daily_costs,
            profit_multiplier,
        }
    }

    /// Export the snapshot view of this ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance,
            daily_stats: self.daily_stats.clone(),
            days_in_operation: self.days_in_operation,
            last_processed_day: self.last_processed_day,
            lifetime: self.lifetime.clone(),
        }
    }

    /// The current balance.
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Running totals for the current day.
    pub const fn daily_stats(&self) -> &DailyStats {
        &self.daily_stats
    }

    /// Lifetime totals across the session.
    pub const fn lifetime(&self) -> &LifetimeStats {
        &self.lifetime
    }

    /// Days of operation settled so far.
    pub const fn days_in_operation(&self) -> u32 {
        self.days_in_operation
    }

    /// The transaction log, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The fixed daily cost table.
    pub const fn daily_costs(&self) -> &DailyCosts {
        &self.daily_costs
    }

    /// The profit multiplier currently applied to sale revenue.
    pub const fn profit_multiplier(&self) -> Decimal {
        self.profit_multiplier
    }

    /// Replace the profit multiplier (difficulty change on restore).
    pub const fn set_profit_multiplier(&mut self, multiplier: Decimal) {
        self.profit_multiplier = multiplier;
    }

    /// Record one completed order in the daily statistics.
    pub const fn record_completed_order(&mut self) {
        self.daily_stats.orders_completed = self.daily_stats.orders_completed.saturating_add(1);
    }

    /// Credit the balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositiveAmount`] if `amount <= 0`; the
    /// state is unchanged.
    pub fn add_money(&mut self, amount: Decimal, memo: &str) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount { amount });
        }

        self.balance = self.balance.saturating_add(amount);
        self.daily_stats.revenue = self.daily_stats.revenue.saturating_add(amount);
        self.daily_stats.profit = self.daily_stats.profit.saturating_add(amount);
        self.lifetime.total_revenue = self.lifetime.total_revenue.saturating_add(amount);
        self.lifetime.total_profit = self.lifetime.total_profit.saturating_add(amount);
        self.push_transaction(TransactionKind::Revenue, amount, memo);

        debug!(%amount, memo, balance = %self.balance, "credit");
        Ok(self.balance)
    }

    /// Debit the balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositiveAmount`] if `amount <= 0`, or
    /// [`LedgerError::InsufficientFunds`] if the balance cannot cover the
    /// debit. The state is unchanged on either decline.
    pub fn subtract_money(&mut self, amount: Decimal, memo: &str) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount { amount });
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }

        self.balance = self.balance.saturating_sub(amount);
        self.daily_stats.expenses = self.daily_stats.expenses.saturating_add(amount);
        self.daily_stats.profit = self.daily_stats.profit.saturating_sub(amount);
        self.lifetime.total_expenses = self.lifetime.total_expenses.saturating_add(amount);
        self.lifetime.total_profit = self.lifetime.total_profit.saturating_sub(amount);
        self.push_transaction(TransactionKind::Expense, amount, memo);

        debug!(%amount, memo, balance = %self.balance, "debit");
        Ok(self.balance)
    }

    /// Settle one unit sold.
    ///
    /// Revenue is scaled by the profit multiplier before the ingredient
    /// cost is charged against it: `net = price * multiplier - cost`. A
    /// non-negative net is credited; a negative net is debited as a loss.
    /// A zero net records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidSale`] for negative inputs, or
    /// [`LedgerError::InsufficientFunds`] when a loss cannot be covered.
    pub fn settle_sale(
        &mut self,
        price: Decimal,
        ingredient_cost: Decimal,
        recipe_name: &str,
    ) -> Result<SaleBreakdown, LedgerError> {
        if price < Decimal::ZERO || ingredient_cost < Decimal::ZERO {
            return Err(LedgerError::InvalidSale {
                price,
                ingredient_cost,
            });
        }

        let gross_profit = price.saturating_sub(ingredient_cost);
        let adjusted_revenue = price.saturating_mul(self.profit_multiplier);
        let net_profit = adjusted_revenue.saturating_sub(ingredient_cost);

        if net_profit > Decimal::ZERO {
            self.add_money(net_profit, &format!("Sale: {recipe_name}"))?;
        } else if net_profit < Decimal::ZERO {
            let loss = net_profit.abs();
            self.subtract_money(loss, &format!("Loss: {recipe_name}"))?;
        }

        Ok(SaleBreakdown {
            gross_profit,
            net_profit,
            profit_multiplier: self.profit_multiplier,
            adjusted_revenue,
            ingredient_cost,
            profitable: net_profit >= Decimal::ZERO,
        })
    }

    /// Settle fixed daily costs for every day elapsed since the last
    /// settlement.
    ///
    /// Idempotent within a day: calling it again before the day counter
    /// advances returns [`DayCloseOutcome::UpToDate`] and charges nothing.
    ///
    /// If the balance cannot cover the critical costs (rent + utilities)
    /// for the whole period, nothing is charged and
    /// [`DayCloseOutcome::Bankrupt`] is returned. Otherwise critical costs
    /// are applied first, then the remaining costs in table order; a
    /// non-critical cost the remaining balance cannot cover is skipped and
    /// reported. Day-end also rolls the daily statistics into the
    /// lifetime best/worst records and resets them for the next day.
    pub fn apply_daily_costs(&mut self, current_day: u32) -> DayCloseOutcome {
        let days_passed = current_day.saturating_sub(self.last_processed_day);
        if days_passed == 0 {
            return DayCloseOutcome::UpToDate;
        }
        let period = Decimal::from(days_passed);

        let critical_due = self.daily_costs.critical_per_day().saturating_mul(period);
        if self.balance < critical_due {
            warn!(
                %critical_due,
                balance = %self.balance,
                days_passed,
                "critical daily costs unaffordable"
            );
            return DayCloseOutcome::Bankrupt {
                critical_due,
                available: self.balance,
                days_passed,
            };
        }

        let mut breakdown = std::collections::BTreeMap::new();
        let mut skipped = Vec::new();
        let mut total_cost = Decimal::ZERO;

        // Critical costs first, then the rest; ALL is already in that order.
        for kind in DailyCostKind::ALL {
            let due = self.daily_costs.amount(kind).saturating_mul(period);
            if due <= Decimal::ZERO {
                continue;
            }
            match self.subtract_money(due, &format!("Daily cost: {kind}")) {
                Ok(_) => {
                    breakdown.insert(kind, due);
                    total_cost = total_cost.saturating_add(due);
                }
                Err(_) => skipped.push(kind),
            }
        }

        // Roll the finished day into lifetime records and reset.
        let day_profit = self.daily_stats.profit;
        if day_profit > self.lifetime.best_day_profit {
            self.lifetime.best_day_profit = day_profit;
        }
        if day_profit < self.lifetime.worst_day_loss {
            self.lifetime.worst_day_loss = day_profit;
        }
        self.daily_stats = DailyStats::default();

        self.days_in_operation = self.days_in_operation.saturating_add(days_passed);
        self.last_processed_day = current_day;

        info!(
            days_passed,
            %total_cost,
            balance = %self.balance,
            skipped = skipped.len(),
            "daily costs settled"
        );

        DayCloseOutcome::Settled(DailySettlement {
            total_cost,
            days_passed,
            breakdown,
            skipped,
            new_balance: self.balance,
            day_number: self.days_in_operation,
        })
    }

    fn push_transaction(&mut self, kind: TransactionKind, amount: Decimal, memo: &str) {
        self.transactions.push(Transaction {
            timestamp: Utc::now(),
            kind,
            amount,
            memo: String::from(memo),
            balance_after: self.balance,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn standard_ledger(balance: Decimal) -> Ledger {
        let costs = DailyCosts::new(dec!(20), dec!(30), dec!(20), dec!(75));
        Ledger::new(balance, costs, Decimal::ONE)
    }

    /// Unwrap a settlement, panicking in tests on any other outcome.
    fn settled(outcome: DayCloseOutcome) -> DailySettlement {
        match outcome {
            DayCloseOutcome::Settled(settlement) => settlement,
            other => panic!("expected a settlement, got {other:?}"),
        }
    }

    #[test]
    fn add_money_rejects_non_positive() {
        let mut ledger = standard_ledger(dec!(100));
        assert!(ledger.add_money(Decimal::ZERO, "nothing").is_err());
        assert!(ledger.add_money(dec!(-5), "negative").is_err());
        assert_eq!(ledger.balance(), dec!(100));
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn subtract_never_drives_balance_negative() {
        let mut ledger = standard_ledger(dec!(50));
        let result = ledger.subtract_money(dec!(50.01), "too much");
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { .. })
        ));
        // Declined debit leaves everything untouched.
        assert_eq!(ledger.balance(), dec!(50));
        assert_eq!(ledger.daily_stats().expenses, Decimal::ZERO);
    }

    #[test]
    fn credit_and_debit_update_stats() {
        let mut ledger = standard_ledger(dec!(100));
        let _ = ledger.add_money(dec!(40), "sale");
        let _ = ledger.subtract_money(dec!(10), "supplies");

        assert_eq!(ledger.balance(), dec!(130));
        assert_eq!(ledger.daily_stats().revenue, dec!(40));
        assert_eq!(ledger.daily_stats().expenses, dec!(10));
        assert_eq!(ledger.daily_stats().profit, dec!(30));
        assert_eq!(ledger.lifetime().total_profit, dec!(30));
        assert_eq!(ledger.transactions().len(), 2);
    }

    #[test]
    fn sale_applies_profit_multiplier() {
        // price 10.00, cost 4.00, multiplier 0.9 -> net 5.00 credited.
        let costs = DailyCosts::new(dec!(20), dec!(30), dec!(20), dec!(75));
        let mut ledger = Ledger::new(dec!(100), costs, dec!(0.9));

        let breakdown = ledger.settle_sale(dec!(10), dec!(4), "Classic Burger").unwrap();

        assert_eq!(breakdown.net_profit, dec!(5.00));
        assert_eq!(breakdown.gross_profit, dec!(6.00));
        assert_eq!(breakdown.adjusted_revenue, dec!(9.00));
        assert!(breakdown.profitable);
        assert_eq!(ledger.balance(), dec!(105.00));
    }

    #[test]
    fn unprofitable_sale_records_a_loss() {
        // price 5.00, cost 4.00, multiplier 0.5 -> net -1.50 debited.
        let costs = DailyCosts::new(dec!(20), dec!(30), dec!(20), dec!(75));
        let mut ledger = Ledger::new(dec!(100), costs, dec!(0.5));

        let result = ledger.settle_sale(dec!(5), dec!(4), "Cheap Burger");
        assert!(result.is_ok());
        assert_eq!(ledger.balance(), dec!(98.50));
        assert_eq!(ledger.daily_stats().expenses, dec!(1.50));
    }

    #[test]
    fn sale_rejects_negative_inputs() {
        let mut ledger = standard_ledger(dec!(100));
        assert!(ledger.settle_sale(dec!(-1), dec!(2), "bad").is_err());
        assert!(ledger.settle_sale(dec!(1), dec!(-2), "bad").is_err());
        assert_eq!(ledger.balance(), dec!(100));
    }

    #[test]
    fn daily_costs_debit_exactly_the_table_total() {
        // 500 - (20 + 30 + 20 + 75 + 10 + 5) = 340
        let mut ledger = standard_ledger(dec!(500));
        let settlement = settled(ledger.apply_daily_costs(1));
        assert_eq!(settlement.total_cost, dec!(160));
        assert_eq!(settlement.days_passed, 1);
        assert!(settlement.skipped.is_empty());
        assert_eq!(ledger.balance(), dec!(340.00));
    }

    #[test]
    fn apply_daily_costs_is_idempotent_within_a_day() {
        let mut ledger = standard_ledger(dec!(500));
        let _ = ledger.apply_daily_costs(1);
        let second = ledger.apply_daily_costs(1);
        assert_eq!(second, DayCloseOutcome::UpToDate);
        assert_eq!(ledger.balance(), dec!(340.00));
    }

    #[test]
    fn elapsed_days_are_charged_together() {
        let mut ledger = standard_ledger(dec!(500));
        let settlement = settled(ledger.apply_daily_costs(2));
        assert_eq!(settlement.days_passed, 2);
        assert_eq!(settlement.total_cost, dec!(320));
        assert_eq!(ledger.balance(), dec!(180.00));
        assert_eq!(ledger.days_in_operation(), 2);
    }

    #[test]
    fn unaffordable_critical_costs_bankrupt_without_charging() {
        // Critical total is 40/day; balance below that is bankruptcy.
        let mut ledger = standard_ledger(dec!(35));
        let outcome = ledger.apply_daily_costs(1);
        assert!(matches!(outcome, DayCloseOutcome::Bankrupt { .. }));
        // Nothing was charged.
        assert_eq!(ledger.balance(), dec!(35));
        assert_eq!(ledger.days_in_operation(), 0);
    }

    #[test]
    fn non_critical_costs_are_skipped_when_unaffordable() {
        // Enough for critical (40) but not the whole table (160).
        let mut ledger = standard_ledger(dec!(100));
        let settlement = settled(ledger.apply_daily_costs(1));
        // Rent + utilities + salary paid (90), tax unaffordable, then
        // insurance and waste still fit.
        assert!(settlement.skipped.contains(&DailyCostKind::Tax));
        assert!(ledger.balance() >= Decimal::ZERO);
    }

    #[test]
    fn day_end_rolls_best_and_worst_records() {
        let mut ledger = standard_ledger(dec!(1000));
        let _ = ledger.add_money(dec!(300), "big day");
        let _ = ledger.apply_daily_costs(1);
        assert_eq!(ledger.lifetime().best_day_profit, dec!(140));
        // Daily stats reset after settlement.
        assert_eq!(ledger.daily_stats().profit, Decimal::ZERO);
    }

    #[test]
    fn snapshot_roundtrip_preserves_balances() {
        let mut ledger = standard_ledger(dec!(500));
        let _ = ledger.add_money(dec!(50), "sale");
        let _ = ledger.apply_daily_costs(1);

        let snapshot = ledger.snapshot();
        let costs = DailyCosts::new(dec!(20), dec!(30), dec!(20), dec!(75));
        let restored = Ledger::from_snapshot(snapshot, costs, Decimal::ONE);

        assert_eq!(restored.balance(), ledger.balance());
        assert_eq!(restored.days_in_operation(), 1);
        // A second settlement for the same day stays idempotent.
        let mut restored = restored;
        assert_eq!(restored.apply_daily_costs(1), DayCloseOutcome::UpToDate);
    }
}
