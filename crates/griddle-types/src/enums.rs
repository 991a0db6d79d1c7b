//! Enumeration types for the restaurant simulation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Difficulty level selected at new-game time.
///
/// Each level maps to a row in the difficulty table of the configuration:
/// customer frequency, order complexity, profit multiplier, and event
/// frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Generous margins, few events.
    Easy,
    /// The baseline experience.
    Normal,
    /// Thin margins and frequent events.
    Hard,
    /// Very thin margins.
    Ultimate,
    /// Customers flood in and almost nothing is profitable.
    Nightmare,
}

impl Difficulty {
    /// All difficulty levels, in ascending order of hostility.
    pub const ALL: [Self; 5] = [
        Self::Easy,
        Self::Normal,
        Self::Hard,
        Self::Ultimate,
        Self::Nightmare,
    ];
}

impl core::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Ultimate => "ultimate",
            Self::Nightmare => "nightmare",
        };
        write!(f, "{name}")
    }
}

impl core::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "ultimate" => Ok(Self::Ultimate),
            "nightmare" => Ok(Self::Nightmare),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Special events
// ---------------------------------------------------------------------------

/// The category an event is drawn from.
///
/// Category selection is a weighted roll; the concrete event is then
/// picked uniformly among the enabled events of that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Windfalls: bonus cash, extra customers, reputation boosts.
    Positive,
    /// Setbacks: fines, repairs, theft, reduced throughput.
    Negative,
    /// Flavor events with no mechanical effect.
    Neutral,
}

/// A special event that can strike the restaurant.
///
/// Events carry an immediate one-time effect (applied at activation) and
/// may impose a durational multiplier on customer arrivals or kitchen
/// capacity while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEvent {
    /// +150% customer arrivals while active.
    RushHour,
    /// A food critic drops by: cash bonus and +15 reputation.
    FoodCritic,
    /// Surprise inspection: fine and -15 reputation.
    HealthInspection,
    /// An employee calls in sick: kitchen capacity halved while active.
    EmployeeSick,
    /// A lucky windfall of cash.
    LuckyDay,
    /// Equipment breaks down: repair bill.
    BrokenEquipment,
    /// Bad weather keeps customers away: -50% arrivals while active.
    BadWeather,
    /// Someone raids the till.
    Theft,
}

impl SpecialEvent {
    /// Every event, used when filtering the enabled set by category.
    pub const ALL: [Self; 8] = [
        Self::RushHour,
        Self::FoodCritic,
        Self::HealthInspection,
        Self::EmployeeSick,
        Self::LuckyDay,
        Self::BrokenEquipment,
        Self::BadWeather,
        Self::Theft,
    ];

    /// The category this event belongs to.
    pub const fn category(self) -> EventCategory {
        match self {
            Self::RushHour | Self::FoodCritic | Self::LuckyDay => EventCategory::Positive,
            Self::HealthInspection
            | Self::EmployeeSick
            | Self::BrokenEquipment
            | Self::BadWeather
            | Self::Theft => EventCategory::Negative,
        }
    }

    /// Multiplier applied to the customer arrival chance while active.
    pub fn customer_multiplier(self) -> Decimal {
        match self {
            Self::RushHour => Decimal::new(25, 1),
            Self::BadWeather => Decimal::new(5, 1),
            _ => Decimal::ONE,
        }
    }

    /// Multiplier applied to kitchen capacity while active.
    pub fn capacity_multiplier(self) -> Decimal {
        match self {
            Self::EmployeeSick => Decimal::new(5, 1),
            _ => Decimal::ONE,
        }
    }

    /// The snake_case key used in the configuration's event toggle table.
    pub const fn key(self) -> &'static str {
        match self {
            Self::RushHour => "rush_hour",
            Self::FoodCritic => "food_critic",
            Self::HealthInspection => "health_inspection",
            Self::EmployeeSick => "employee_sick",
            Self::LuckyDay => "lucky_day",
            Self::BrokenEquipment => "broken_equipment",
            Self::BadWeather => "bad_weather",
            Self::Theft => "theft",
        }
    }
}

impl core::fmt::Display for SpecialEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::RushHour => "Rush Hour",
            Self::FoodCritic => "Food Critic",
            Self::HealthInspection => "Health Inspection",
            Self::EmployeeSick => "Employee Sick",
            Self::LuckyDay => "Lucky Day",
            Self::BrokenEquipment => "Broken Equipment",
            Self::BadWeather => "Bad Weather",
            Self::Theft => "Theft",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Daily costs
// ---------------------------------------------------------------------------

/// A fixed daily operating cost.
///
/// Rent and utilities form the critical subset: if the balance cannot
/// cover them for the elapsed period the restaurant goes bankrupt, even
/// when the remaining costs would simply be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyCostKind {
    /// Rent on the premises. Critical.
    Rent,
    /// Employee salaries.
    Salary,
    /// Power and water. Critical.
    Utilities,
    /// Daily tax.
    Tax,
    /// Insurance premium.
    Insurance,
    /// Waste disposal fee.
    WasteDisposal,
}

impl DailyCostKind {
    /// Every cost kind, in settlement order (critical costs first).
    pub const ALL: [Self; 6] = [
        Self::Rent,
        Self::Utilities,
        Self::Salary,
        Self::Tax,
        Self::Insurance,
        Self::WasteDisposal,
    ];

    /// Whether failing to pay this cost is a bankruptcy condition.
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::Rent | Self::Utilities)
    }
}

impl core::fmt::Display for DailyCostKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Rent => "rent",
            Self::Salary => "salary",
            Self::Utilities => "utilities",
            Self::Tax => "tax",
            Self::Insurance => "insurance",
            Self::WasteDisposal => "waste disposal",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in: sales, event windfalls.
    Revenue,
    /// Money out: purchases, daily costs, fines, losses.
    Expense,
}

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// A purchasable upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Better kitchen equipment: +1 capacity per level, up to 5 levels.
    UpgradeKitchen,
    /// An extra pair of hands: +1 capacity per hire, up to 3 hires.
    NewEmployee,
    /// Unlocks one random secret recipe.
    NewRecipe,
}

impl UpgradeKind {
    /// Maximum number of times this upgrade can be purchased.
    pub const fn max_level(self) -> u32 {
        match self {
            Self::UpgradeKitchen => 5,
            Self::NewEmployee => 3,
            Self::NewRecipe => 1,
        }
    }

    /// Capacity contributed per purchased level.
    pub const fn capacity_bonus(self) -> u32 {
        match self {
            Self::UpgradeKitchen | Self::NewEmployee => 1,
            Self::NewRecipe => 0,
        }
    }

    /// The snake_case key used in the configuration's unlock cost table.
    pub const fn key(self) -> &'static str {
        match self {
            Self::UpgradeKitchen => "upgrade_kitchen",
            Self::NewEmployee => "new_employee",
            Self::NewRecipe => "new_recipe",
        }
    }
}

impl core::fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// A milestone the player can unlock exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Completed the first order of the session.
    FirstSale,
    /// Completed ten orders across the session.
    TenthSale,
    /// Completed five orders within a single day.
    FiveOrdersInADay,
    /// Reputation reached 100.
    ReputationMaxed,
    /// Kitchen upgraded to level 3 or beyond.
    KitchenVeteran,
    /// Hired a second employee.
    SmallTeam,
}

impl core::fmt::Display for Achievement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::FirstSale => "First Sale",
            Self::TenthSale => "Tenth Sale",
            Self::FiveOrdersInADay => "Five Orders In A Day",
            Self::ReputationMaxed => "Reputation Maxed",
            Self::KitchenVeteran => "Kitchen Veteran",
            Self::SmallTeam => "Small Team",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Terminal outcomes
// ---------------------------------------------------------------------------

/// How a game session ended.
///
/// Terminal conditions are expected state-machine outcomes, not errors.
/// Once one is reached, further hour-advances are declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// Survived the configured number of days.
    Victory,
    /// Balance hit zero, or critical daily costs could not be paid.
    Bankruptcy,
    /// Reputation collapsed to zero.
    ReputationCollapse,
}

impl GameOutcome {
    /// Whether the session counts as a win.
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }
}

impl core::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Victory => "victory",
            Self::Bankruptcy => "bankruptcy",
            Self::ReputationCollapse => "reputation collapse",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_categories_partition_all_events() {
        let positive = SpecialEvent::ALL
            .iter()
            .filter(|e| e.category() == EventCategory::Positive)
            .count();
        let negative = SpecialEvent::ALL
            .iter()
            .filter(|e| e.category() == EventCategory::Negative)
            .count();
        assert_eq!(positive, 3);
        assert_eq!(negative, 5);
    }

    #[test]
    fn rush_hour_boosts_customers() {
        assert_eq!(
            SpecialEvent::RushHour.customer_multiplier(),
            Decimal::new(25, 1)
        );
        assert_eq!(SpecialEvent::RushHour.capacity_multiplier(), Decimal::ONE);
    }

    #[test]
    fn sick_employee_halves_capacity() {
        assert_eq!(
            SpecialEvent::EmployeeSick.capacity_multiplier(),
            Decimal::new(5, 1)
        );
    }

    #[test]
    fn critical_costs_are_rent_and_utilities() {
        let critical: Vec<_> = DailyCostKind::ALL
            .iter()
            .copied()
            .filter(|c| c.is_critical())
            .collect();
        assert_eq!(critical, vec![DailyCostKind::Rent, DailyCostKind::Utilities]);
    }

    #[test]
    fn upgrade_levels_match_design() {
        assert_eq!(UpgradeKind::UpgradeKitchen.max_level(), 5);
        assert_eq!(UpgradeKind::NewEmployee.max_level(), 3);
        assert_eq!(UpgradeKind::NewRecipe.max_level(), 1);
        assert_eq!(UpgradeKind::NewRecipe.capacity_bonus(), 0);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Nightmare).unwrap_or_default();
        assert_eq!(json, "\"nightmare\"");
    }
}
