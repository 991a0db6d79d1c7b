//! Balance tracking, transaction history, and daily-cost settlement.
//!
//! The ledger is the single source of truth for solvency. Money only
//! moves through [`Ledger::add_money`] and [`Ledger::subtract_money`],
//! which enforce two invariants:
//!
//! 1. Amounts are strictly positive -- callers express direction by the
//!    operation they pick, never by the sign of the amount.
//! 2. A debit never drives the balance negative; an unaffordable debit is
//!    declined and the state is left untouched.
//!
//! Sales settle through [`Ledger::settle_sale`], which applies the
//! difficulty's profit multiplier to revenue before computing the net; a
//! negative net is recorded as a loss. Fixed daily costs settle once per
//! elapsed in-game day through [`Ledger::apply_daily_costs`], with a
//! critical subset (rent, utilities) whose unaffordability bankrupts the
//! restaurant outright.
//!
//! All amounts are [`rust_decimal::Decimal`] -- no floating point.

pub mod costs;
pub mod ledger;

pub use costs::DailyCosts;
pub use ledger::{DayCloseOutcome, Ledger};

use rust_decimal::Decimal;

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The amount was zero or negative.
    #[error("amount must be strictly positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// A debit exceeded the available balance.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// The amount the caller tried to debit.
        required: Decimal,
        /// The balance at the time of the attempt.
        available: Decimal,
    },

    /// A sale was submitted with a negative price or ingredient cost.
    #[error("invalid sale: price {price} and ingredient cost {ingredient_cost} must be non-negative")]
    InvalidSale {
        /// The submitted price.
        price: Decimal,
        /// The submitted ingredient cost.
        ingredient_cost: Decimal,
    },
}
