//! Configuration loading and typed config structures.
//!
//! The canonical configuration is a single YAML file covering the
//! economy constants, gameplay constants, working-hours window, the
//! difficulty table, the event catalog, upgrade base costs, and the
//! ingredient and recipe catalogs. Every field has a default, so an
//! empty file (or no file at all) yields a playable game.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use griddle_ledger::DailyCosts;
use griddle_menu::RecipeSpec;
use griddle_stock::IngredientSpec;
use griddle_types::Difficulty;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Economy constants: starting balance and fixed daily costs.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Gameplay constants: queue limits, timeouts, seed.
    #[serde(default)]
    pub gameplay: GameplayConfig,

    /// Working-hours window and session length.
    #[serde(default)]
    pub time: TimeConfig,

    /// Per-difficulty modifiers.
    #[serde(default)]
    pub difficulty: DifficultyTable,

    /// Random event tuning.
    #[serde(default)]
    pub events: EventsConfig,

    /// Base costs of the purchasable upgrades.
    #[serde(default)]
    pub upgrades: UpgradeCosts,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Snapshot persistence configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Ingredient catalog: `category -> name -> spec`.
    #[serde(default = "default_ingredient_catalog")]
    pub ingredients: BTreeMap<String, BTreeMap<String, IngredientSpec>>,

    /// Recipe catalog: `id -> spec`.
    #[serde(default = "default_recipe_catalog")]
    pub recipes: BTreeMap<String, RecipeSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            economy: EconomyConfig::default(),
            gameplay: GameplayConfig::default(),
            time: TimeConfig::default(),
            difficulty: DifficultyTable::default(),
            events: EventsConfig::default(),
            upgrades: UpgradeCosts::default(),
            logging: LoggingConfig::default(),
            persistence: PersistenceConfig::default(),
            ingredients: default_ingredient_catalog(),
            recipes: default_recipe_catalog(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The difficulty row for a level, falling back to defaults for a
    /// level the table does not define.
    pub fn difficulty_level(&self, difficulty: Difficulty) -> DifficultyLevel {
        self.difficulty
            .levels
            .get(&difficulty)
            .cloned()
            .unwrap_or_else(|| DifficultyLevel::builtin(difficulty))
    }

    /// The fixed daily cost table derived from the economy constants.
    pub fn daily_costs(&self) -> DailyCosts {
        DailyCosts::new(
            self.economy.rent,
            self.economy.employee_salary,
            self.economy.utility_price,
            self.economy.daily_tax,
        )
    }
}

/// Economy constants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Balance at new-game.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// Daily rent. Critical cost.
    #[serde(default = "default_rent")]
    pub rent: Decimal,

    /// Daily salary total.
    #[serde(default = "default_employee_salary")]
    pub employee_salary: Decimal,

    /// Daily utilities. Critical cost.
    #[serde(default = "default_utility_price")]
    pub utility_price: Decimal,

    /// Daily tax.
    #[serde(default = "default_daily_tax")]
    pub daily_tax: Decimal,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            rent: default_rent(),
            employee_salary: default_employee_salary(),
            utility_price: default_utility_price(),
            daily_tax: default_daily_tax(),
        }
    }
}

/// Gameplay constants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameplayConfig {
    /// Seed for the engine's random rolls.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Soft cap on concurrent orders; arrivals are rejected outright at
    /// three times this value.
    #[serde(default = "default_max_concurrent_orders")]
    pub max_concurrent_orders: u32,

    /// Base customer patience, scaled per difficulty. Loaded content;
    /// order expiry itself is governed by `order_timeout`.
    #[serde(default = "default_customer_patience")]
    pub customer_patience: u32,

    /// Cap on units per order; the roll is `1..=min(3, this)`.
    #[serde(default = "default_max_burgers_per_order")]
    pub max_burgers_per_order: u32,

    /// Hours an order may wait before it expires.
    #[serde(default = "default_order_timeout")]
    pub order_timeout: u32,

    /// Reputation at new-game.
    #[serde(default = "default_initial_reputation")]
    pub initial_reputation: Decimal,

    /// Real-time milliseconds between simulated hours in the automated
    /// run loop.
    #[serde(default = "default_hour_interval_ms")]
    pub hour_interval_ms: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_concurrent_orders: default_max_concurrent_orders(),
            customer_patience: default_customer_patience(),
            max_burgers_per_order: default_max_burgers_per_order(),
            order_timeout: default_order_timeout(),
            initial_reputation: default_initial_reputation(),
            hour_interval_ms: default_hour_interval_ms(),
        }
    }
}

/// Working-hours window and session length.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// First working hour of the day.
    #[serde(default = "default_working_start")]
    pub working_start: u32,

    /// Last working hour of the day.
    #[serde(default = "default_working_end")]
    pub working_end: u32,

    /// Days to survive for victory.
    #[serde(default = "default_days")]
    pub days: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            working_start: default_working_start(),
            working_end: default_working_end(),
            days: default_days(),
        }
    }
}

/// One row of the difficulty table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DifficultyLevel {
    /// Scales the customer arrival chance.
    #[serde(default = "default_one")]
    pub customer_frequency: Decimal,

    /// Order complexity factor (loaded content).
    #[serde(default = "default_one")]
    pub order_complexity: Decimal,

    /// Profit multiplier applied to sale revenue.
    #[serde(default = "default_one")]
    pub profit: Decimal,

    /// Event frequency factor (loaded content).
    #[serde(default = "default_one")]
    pub event_frequency: Decimal,
}

impl DifficultyLevel {
    /// The built-in row for a difficulty, used when the configured table
    /// omits it.
    pub fn builtin(difficulty: Difficulty) -> Self {
        let (frequency, complexity, profit, events) = match difficulty {
            Difficulty::Easy => ("1.0", "0.7", "1.0", "0.8"),
            Difficulty::Normal => ("1.3", "1.0", "0.9", "1.3"),
            Difficulty::Hard => ("1.7", "1.6", "0.7", "1.6"),
            Difficulty::Ultimate => ("2.2", "2.0", "0.6", "1.9"),
            Difficulty::Nightmare => ("4.2", "3.7", "0.5", "3.0"),
        };
        Self {
            customer_frequency: parse_decimal(frequency),
            order_complexity: parse_decimal(complexity),
            profit: parse_decimal(profit),
            event_frequency: parse_decimal(events),
        }
    }
}

/// The difficulty table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DifficultyTable {
    /// Difficulty level -> modifiers.
    #[serde(default = "default_difficulty_levels")]
    pub levels: BTreeMap<Difficulty, DifficultyLevel>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            levels: default_difficulty_levels(),
        }
    }
}

/// Weighted chances of each event category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventWeights {
    /// Weight of the positive category.
    #[serde(default = "default_positive_weight")]
    pub positive: u32,

    /// Weight of the negative category.
    #[serde(default = "default_negative_weight")]
    pub negative: u32,

    /// Weight of the neutral category.
    #[serde(default = "default_neutral_weight")]
    pub neutral: u32,
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            positive: default_positive_weight(),
            negative: default_negative_weight(),
            neutral: default_neutral_weight(),
        }
    }
}

/// Random event tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventsConfig {
    /// Master toggle for the event system.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum hours between event rolls.
    #[serde(default = "default_event_min_interval")]
    pub min_interval: u32,

    /// Maximum hours between event rolls.
    #[serde(default = "default_event_max_interval")]
    pub max_interval: u32,

    /// Hours an activated event stays in effect.
    #[serde(default = "default_event_duration")]
    pub event_duration: u32,

    /// Category weights for the trigger roll.
    #[serde(default)]
    pub probabilities: EventWeights,

    /// Per-event enable toggles, keyed by the event's snake_case name.
    /// Events missing from the map are enabled.
    #[serde(default)]
    pub special_events: BTreeMap<String, bool>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval: default_event_min_interval(),
            max_interval: default_event_max_interval(),
            event_duration: default_event_duration(),
            probabilities: EventWeights::default(),
            special_events: BTreeMap::new(),
        }
    }
}

/// Base costs of the purchasable upgrades. Each repeat purchase costs
/// 15% more per level already owned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpgradeCosts {
    /// Kitchen upgrade base cost.
    #[serde(default = "default_upgrade_kitchen_cost")]
    pub upgrade_kitchen: Decimal,

    /// New employee base cost.
    #[serde(default = "default_new_employee_cost")]
    pub new_employee: Decimal,

    /// Secret recipe unlock cost.
    #[serde(default = "default_new_recipe_cost")]
    pub new_recipe: Decimal,
}

impl Default for UpgradeCosts {
    fn default() -> Self {
        Self {
            upgrade_kitchen: default_upgrade_kitchen_cost(),
            new_employee: default_new_employee_cost(),
            new_recipe: default_new_recipe_cost(),
        }
    }
}

impl UpgradeCosts {
    /// Base cost for one upgrade kind.
    pub const fn base_cost(&self, kind: griddle_types::UpgradeKind) -> Decimal {
        match kind {
            griddle_types::UpgradeKind::UpgradeKitchen => self.upgrade_kitchen,
            griddle_types::UpgradeKind::NewEmployee => self.new_employee,
            griddle_types::UpgradeKind::NewRecipe => self.new_recipe,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_save_path")]
    pub save_path: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            save_path: default_save_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

/// Parse a decimal literal that is known-good at compile time.
fn parse_decimal(text: &str) -> Decimal {
    text.parse().unwrap_or(Decimal::ONE)
}

fn default_initial_balance() -> Decimal {
    Decimal::new(500, 0)
}

fn default_rent() -> Decimal {
    Decimal::new(20, 0)
}

fn default_employee_salary() -> Decimal {
    Decimal::new(30, 0)
}

fn default_utility_price() -> Decimal {
    Decimal::new(20, 0)
}

fn default_daily_tax() -> Decimal {
    Decimal::new(75, 0)
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_concurrent_orders() -> u32 {
    10
}

const fn default_customer_patience() -> u32 {
    50
}

const fn default_max_burgers_per_order() -> u32 {
    3
}

const fn default_order_timeout() -> u32 {
    6
}

fn default_initial_reputation() -> Decimal {
    Decimal::new(50, 0)
}

const fn default_hour_interval_ms() -> u64 {
    250
}

const fn default_working_start() -> u32 {
    8
}

const fn default_working_end() -> u32 {
    20
}

const fn default_days() -> u32 {
    7
}

fn default_one() -> Decimal {
    Decimal::ONE
}

fn default_difficulty_levels() -> BTreeMap<Difficulty, DifficultyLevel> {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| (difficulty, DifficultyLevel::builtin(difficulty)))
        .collect()
}

const fn default_positive_weight() -> u32 {
    30
}

const fn default_negative_weight() -> u32 {
    45
}

const fn default_neutral_weight() -> u32 {
    25
}

const fn default_event_min_interval() -> u32 {
    3
}

const fn default_event_max_interval() -> u32 {
    8
}

const fn default_event_duration() -> u32 {
    3
}

fn default_upgrade_kitchen_cost() -> Decimal {
    Decimal::new(1000, 0)
}

fn default_new_employee_cost() -> Decimal {
    Decimal::new(50, 0)
}

fn default_new_recipe_cost() -> Decimal {
    Decimal::new(100, 0)
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_save_path() -> String {
    String::from("data/savestate.json")
}

const fn default_true() -> bool {
    true
}

fn default_ingredient_catalog() -> BTreeMap<String, BTreeMap<String, IngredientSpec>> {
    fn spec(
        name: &str,
        cost: &str,
        initial: u32,
        reorder: u32,
        restock: u32,
        critical: bool,
    ) -> IngredientSpec {
        IngredientSpec {
            display_name: String::from(name),
            base_cost: parse_decimal(cost),
            initial_quantity: initial,
            reorder_point: reorder,
            restock_quantity: restock,
            critical,
        }
    }

    BTreeMap::from([
        (
            String::from("hamburger"),
            BTreeMap::from([
                (
                    String::from("beef"),
                    spec("Beef Patty", "1.5", 12, 5, 10, true),
                ),
                (
                    String::from("chicken"),
                    spec("Chicken Patty", "1.2", 10, 4, 10, true),
                ),
            ]),
        ),
        (
            String::from("bread"),
            BTreeMap::from([
                (String::from("bun"), spec("Bun", "0.5", 20, 8, 15, true)),
                (
                    String::from("sesame_bun"),
                    spec("Sesame Bun", "0.7", 10, 4, 10, false),
                ),
            ]),
        ),
        (
            String::from("topping"),
            BTreeMap::from([
                (
                    String::from("cheese"),
                    spec("Cheese", "0.8", 15, 6, 12, false),
                ),
                (
                    String::from("lettuce"),
                    spec("Lettuce", "0.3", 15, 6, 12, false),
                ),
                (
                    String::from("tomato"),
                    spec("Tomato", "0.4", 15, 6, 12, false),
                ),
            ]),
        ),
        (
            String::from("sauces"),
            BTreeMap::from([
                (
                    String::from("ketchup"),
                    spec("Ketchup", "0.1", 30, 10, 20, false),
                ),
                (String::from("mayo"), spec("Mayo", "0.1", 30, 10, 20, false)),
            ]),
        ),
        (
            String::from("secret"),
            BTreeMap::from([(
                String::from("truffle"),
                spec("Black Truffle", "5.0", 2, 1, 2, false),
            )]),
        ),
    ])
}

fn default_recipe_catalog() -> BTreeMap<String, RecipeSpec> {
    fn spec(name: &str, ingredients: &[(&str, u32)], cost: &str, price: &str) -> RecipeSpec {
        RecipeSpec {
            name: String::from(name),
            ingredients: ingredients
                .iter()
                .map(|(path, qty)| (String::from(*path), *qty))
                .collect(),
            cost: parse_decimal(cost),
            price: parse_decimal(price),
        }
    }

    BTreeMap::from([
        (
            String::from("classic"),
            spec(
                "Classic Burger",
                &[
                    ("hamburger.beef", 1),
                    ("bread.bun", 1),
                    ("sauces.ketchup", 1),
                ],
                "2.1",
                "6.5",
            ),
        ),
        (
            String::from("cheeseburger"),
            spec(
                "Cheeseburger",
                &[
                    ("hamburger.beef", 1),
                    ("bread.bun", 1),
                    ("topping.cheese", 1),
                    ("sauces.ketchup", 1),
                ],
                "2.9",
                "7.5",
            ),
        ),
        (
            String::from("garden_chicken"),
            spec(
                "Garden Chicken",
                &[
                    ("hamburger.chicken", 1),
                    ("bread.bun", 1),
                    ("topping.lettuce", 1),
                    ("topping.tomato", 1),
                    ("sauces.mayo", 1),
                ],
                "2.5",
                "7.0",
            ),
        ),
        (
            String::from("truffle_royale"),
            spec(
                "Truffle Royale",
                &[
                    ("hamburger.beef", 2),
                    ("bread.sesame_bun", 1),
                    ("topping.cheese", 1),
                    ("secret.truffle", 1),
                ],
                "9.4",
                "18.0",
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_playable() {
        let config = GameConfig::default();
        assert_eq!(config.economy.initial_balance, Decimal::new(500, 0));
        assert_eq!(config.time.days, 7);
        assert_eq!(config.gameplay.max_concurrent_orders, 10);
        assert!(!config.recipes.is_empty());
        assert!(!config.ingredients.is_empty());
    }

    #[test]
    fn parse_empty_yaml_yields_defaults() {
        let config = GameConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn parse_overrides_selected_fields() {
        let yaml = r"
economy:
  initial_balance: 750
  rent: 25
time:
  working_start: 9
  working_end: 18
  days: 14
gameplay:
  seed: 7
  order_timeout: 3
events:
  enabled: false
";
        let config = GameConfig::parse(yaml).ok().unwrap_or_default();
        assert_eq!(config.economy.initial_balance, Decimal::new(750, 0));
        assert_eq!(config.economy.rent, Decimal::new(25, 0));
        // Untouched sections keep their defaults.
        assert_eq!(config.economy.daily_tax, Decimal::new(75, 0));
        assert_eq!(config.time.days, 14);
        assert_eq!(config.gameplay.seed, 7);
        assert!(!config.events.enabled);
    }

    #[test]
    fn difficulty_table_has_all_levels_by_default() {
        let config = GameConfig::default();
        for difficulty in Difficulty::ALL {
            let level = config.difficulty_level(difficulty);
            assert!(level.profit > Decimal::ZERO);
        }
    }

    #[test]
    fn nightmare_profit_multiplier_is_half() {
        let config = GameConfig::default();
        let level = config.difficulty_level(Difficulty::Nightmare);
        assert_eq!(level.profit, Decimal::new(5, 1));
        assert_eq!(level.customer_frequency, Decimal::new(42, 1));
    }

    #[test]
    fn daily_costs_derive_from_economy() {
        let config = GameConfig::default();
        let costs = config.daily_costs();
        // 20 + 30 + 20 + 75 + 10 + 5
        assert_eq!(costs.total_per_day(), Decimal::new(160, 0));
    }

    #[test]
    fn difficulty_parses_as_lowercase_keys() {
        let yaml = r"
difficulty:
  levels:
    hard:
      customer_frequency: 2.0
      profit: 0.65
";
        let config = GameConfig::parse(yaml).ok().unwrap_or_default();
        let hard = config.difficulty_level(Difficulty::Hard);
        assert_eq!(hard.customer_frequency, Decimal::new(2, 0));
        assert_eq!(hard.profit, Decimal::new(65, 2));
        // Omitted fields inside a configured row fall back to 1.
        assert_eq!(hard.order_complexity, Decimal::ONE);
    }

    #[test]
    fn default_catalog_contains_one_secret_recipe() {
        let config = GameConfig::default();
        let secret: Vec<_> = config
            .recipes
            .iter()
            .filter(|(_, spec)| {
                spec.ingredients
                    .keys()
                    .any(|path| path.starts_with("secret."))
            })
            .collect();
        assert_eq!(secret.len(), 1);
    }
}
