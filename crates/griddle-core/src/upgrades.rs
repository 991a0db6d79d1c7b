//! Upgrade purchases and the capacity they derive.
//!
//! Kitchen capacity is a pure function of the purchase counts (base 1,
//! plus one per kitchen level and per employee), scaled transiently by
//! active events at the point of use. No capacity value is ever stored,
//! so there is nothing to restore when an event expires.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use griddle_types::UpgradeKind;

use crate::error::EngineError;

/// Unmodified kitchen capacity before any upgrades.
const BASE_CAPACITY: u32 = 1;

/// Price growth per level already owned: 15%.
const PRICE_STEP: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Purchase counts per upgrade kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeTracker {
    counts: BTreeMap<UpgradeKind, u32>,
}

impl UpgradeTracker {
    /// A tracker with no purchases.
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Restore from snapshot counts.
    pub const fn from_counts(counts: BTreeMap<UpgradeKind, u32>) -> Self {
        Self { counts }
    }

    /// The snapshot view of the purchase counts.
    pub const fn counts(&self) -> &BTreeMap<UpgradeKind, u32> {
        &self.counts
    }

    /// Times one upgrade has been purchased.
    pub fn count(&self, kind: UpgradeKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total purchases across all upgrades.
    pub fn total_purchases(&self) -> u32 {
        self.counts
            .values()
            .fold(0, |acc, count| acc.saturating_add(*count))
    }

    /// Kitchen capacity derived from the purchase counts alone.
    pub fn base_capacity(&self) -> u32 {
        self.counts
            .iter()
            .fold(BASE_CAPACITY, |acc, (kind, count)| {
                acc.saturating_add(kind.capacity_bonus().saturating_mul(*count))
            })
    }

    /// Current price of the next level: `base * (1 + 0.15 * owned)`.
    pub fn price(&self, kind: UpgradeKind, base_cost: Decimal) -> Decimal {
        let owned = Decimal::from(self.count(kind));
        let multiplier = Decimal::ONE.saturating_add(PRICE_STEP.saturating_mul(owned));
        base_cost.saturating_mul(multiplier)
    }

    /// Record a purchase, enforcing the level cap.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UpgradeMaxed`] when the upgrade is already
    /// at its maximum level; the counts are unchanged.
    pub fn record(&mut self, kind: UpgradeKind) -> Result<u32, EngineError> {
        let current = self.count(kind);
        if current >= kind.max_level() {
            return Err(EngineError::UpgradeMaxed {
                kind,
                level: current,
            });
        }
        let next = current.saturating_add(1);
        self.counts.insert(kind, next);
        Ok(next)
    }
}
