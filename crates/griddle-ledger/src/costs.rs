//! The fixed daily operating cost table.

use rust_decimal::Decimal;

use griddle_types::DailyCostKind;

/// Insurance premium per day. Not configurable.
const INSURANCE_PER_DAY: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Waste disposal fee per day. Not configurable.
const WASTE_DISPOSAL_PER_DAY: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Fixed costs charged for every elapsed in-game day.
///
/// Rent, salary, utilities, and tax come from the economy configuration;
/// insurance and waste disposal are flat fees. Rent and utilities are the
/// critical subset -- see [`DailyCostKind::is_critical`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCosts {
    rent: Decimal,
    salary: Decimal,
    utilities: Decimal,
    tax: Decimal,
}

impl DailyCosts {
    /// Build the cost table from the configured economy constants.
    pub const fn new(rent: Decimal, salary: Decimal, utilities: Decimal, tax: Decimal) -> Self {
        Self {
            rent,
            salary,
            utilities,
            tax,
        }
    }

    /// The per-day amount for one cost kind.
    pub const fn amount(&self, kind: DailyCostKind) -> Decimal {
        match kind {
            DailyCostKind::Rent => self.rent,
            DailyCostKind::Salary => self.salary,
            DailyCostKind::Utilities => self.utilities,
            DailyCostKind::Tax => self.tax,
            DailyCostKind::Insurance => INSURANCE_PER_DAY,
            DailyCostKind::WasteDisposal => WASTE_DISPOSAL_PER_DAY,
        }
    }

    /// Sum of all costs for a single day.
    pub fn total_per_day(&self) -> Decimal {
        DailyCostKind::ALL
            .iter()
            .fold(Decimal::ZERO, |acc, kind| {
                acc.saturating_add(self.amount(*kind))
            })
    }

    /// Sum of the critical costs (rent, utilities) for a single day.
    pub fn critical_per_day(&self) -> Decimal {
        DailyCostKind::ALL
            .iter()
            .filter(|kind| kind.is_critical())
            .fold(Decimal::ZERO, |acc, kind| {
                acc.saturating_add(self.amount(*kind))
            })
    }
}
