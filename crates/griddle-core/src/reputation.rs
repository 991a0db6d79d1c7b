//! Reputation: a clamped 0..=100 score gating customer arrivals.
//!
//! Every mutation goes through [`Reputation::adjust`], the single clamp
//! site. The arrival-rate factor floors at 0.5 so even a restaurant at
//! zero reputation still sees half the base customer chance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lower bound of the reputation domain.
const MIN: Decimal = Decimal::ZERO;

/// Upper bound of the reputation domain.
const MAX: Decimal = Decimal::ONE_HUNDRED;

/// Floor of the arrival-rate factor.
const FACTOR_FLOOR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// The restaurant's reputation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reputation(Decimal);

impl Reputation {
    /// Create a reputation, clamping the initial value into the domain.
    pub fn new(value: Decimal) -> Self {
        Self(value.clamp(MIN, MAX))
    }

    /// The current score.
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Apply a delta (positive or negative) and clamp to the domain.
    /// Returns the new score.
    pub fn adjust(&mut self, delta: Decimal) -> Decimal {
        self.0 = self.0.saturating_add(delta).clamp(MIN, MAX);
        self.0
    }

    /// Whether reputation has collapsed to zero (a terminal condition).
    pub fn is_depleted(self) -> bool {
        self.0 <= MIN
    }

    /// Whether reputation has hit the cap (achievement trigger).
    pub fn is_maxed(self) -> bool {
        self.0 >= MAX
    }

    /// The customer-arrival factor: `reputation / 100`, floored at 0.5.
    pub fn arrival_factor(self) -> Decimal {
        self.0
            .checked_div(MAX)
            .unwrap_or(FACTOR_FLOOR)
            .max(FACTOR_FLOOR)
    }
}
